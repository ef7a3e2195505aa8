//! Screens of the client expressed as services over the backend ports.

pub mod analytics;
pub mod auth;
pub mod backend;
pub mod campaigns;
pub mod compose;
pub mod error;
pub mod gmail;
pub mod history;
pub mod profile;
pub mod search;
pub mod session;
pub mod templates;
pub mod toasts;

#[cfg(test)]
pub(crate) mod testing;
