//! Infrastructure adapters: HTTP transport, token storage and telemetry.

pub mod error;
pub mod http;
pub mod session_store;
pub mod telemetry;
