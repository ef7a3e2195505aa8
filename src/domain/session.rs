//! Authentication state machine for the session gate.
//!
//! `Loading` is the mount state: it resolves exactly once into either
//! `Authenticated` or `Unauthenticated`. Afterwards the gate only moves between
//! those two.

use devlink_api_types::User;

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Loading,
    Authenticated(User),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// Stored token accepted by the backend.
    Restored(User),
    /// No stored token, or restoring it failed for a reason other than expiry.
    NoSession,
    LoggedIn(User),
    LoggedOut,
    /// Backend answered 401 for a request carrying the session token.
    Expired,
}

impl AuthState {
    pub fn apply(self, event: AuthEvent) -> Result<Self, DomainError> {
        match (self, event) {
            (Self::Loading, AuthEvent::Restored(user)) => Ok(Self::Authenticated(user)),
            (Self::Loading, AuthEvent::NoSession | AuthEvent::Expired | AuthEvent::LoggedOut) => {
                Ok(Self::Unauthenticated)
            }
            (
                Self::Loading | Self::Unauthenticated | Self::Authenticated(_),
                AuthEvent::LoggedIn(user),
            ) => Ok(Self::Authenticated(user)),
            (
                Self::Authenticated(_) | Self::Unauthenticated,
                AuthEvent::LoggedOut | AuthEvent::Expired,
            ) => Ok(Self::Unauthenticated),
            (state, event) => Err(DomainError::transition(format!(
                "{event:?} is not valid while {}",
                state.label()
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
