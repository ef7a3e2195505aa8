use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("`{field}` is required")]
    Required { field: &'static str },
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error("invalid state transition: {message}")]
    Transition { message: String },
}

impl DomainError {
    pub fn required(field: &'static str) -> Self {
        Self::Required { field }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn transition(message: impl Into<String>) -> Self {
        Self::Transition {
            message: message.into(),
        }
    }

    /// Short text suitable for an inline banner or toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Required { field } => format!("{} is required", capitalize(field)),
            Self::Validation { message } | Self::Transition { message } => message.clone(),
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}
