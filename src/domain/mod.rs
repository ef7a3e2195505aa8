//! Client-side rules and state that do not touch the network.

pub mod compose;
pub mod error;
pub mod search;
pub mod session;
pub mod toast;
