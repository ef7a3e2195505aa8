//! DevLink client: session handling, business discovery and outreach email
//! workflows over the DevLink HTTP API.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub(crate) mod util;
