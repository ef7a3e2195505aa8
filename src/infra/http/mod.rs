//! HTTP adapter for the backend ports.

mod client;

pub use client::ApiClient;
