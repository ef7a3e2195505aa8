#![deny(clippy::all, clippy::pedantic)]

use devlink::application::error::AppError;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// Inline form errors go to stderr next to the toasts.
pub fn print_inline_error(message: Option<&str>) {
    if let Some(message) = message {
        eprintln!("{message}");
    }
}
