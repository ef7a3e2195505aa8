#![deny(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod analytics;
pub mod auth;
pub mod businesses;
pub mod campaigns;
pub mod email;
pub mod gmail;
pub mod profile;
pub mod templates;
