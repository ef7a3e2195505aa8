use thiserror::Error;

use crate::{
    application::session::TokenStoreError, domain::error::DomainError, infra::error::InfraError,
};

/// Failure reported by a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },
    #[error(
        "server responded with status {status}{}",
        .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    Server { status: u16, detail: Option<String> },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl ApiError {
    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self::Server { status, detail }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Message supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Server { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidInput(_) => None,
        }
    }

    /// Backend detail when present, else the action-specific fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Failure of a user-initiated action on one of the screens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("no businesses selected")]
    NothingSelected,
    #[error("not signed in")]
    NotAuthenticated,
    #[error("{entity} {id} is not loaded")]
    NotLoaded { entity: &'static str, id: i64 },
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl ActionError {
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err.user_message(fallback),
            Self::Domain(err) => err.user_message(),
            Self::NothingSelected => "Select at least one business first".to_string(),
            Self::NotAuthenticated => "Please log in first".to_string(),
            Self::NotLoaded { entity, id } => format!("Unknown {entity} #{id}"),
            Self::TokenStore(_) => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("session expired, please log in again")]
    SessionExpired,
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self::Action(ActionError::Api(err))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::Action(ActionError::Domain(err))
    }
}
