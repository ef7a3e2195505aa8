//! Session gate: owns the authentication state and the "session expired" notice.

use std::sync::Arc;

use devlink_api_types::{LoginRequest, RegisterRequest, User};
use tracing::{debug, info, warn};

use crate::application::backend::AuthApi;
use crate::application::error::ActionError;
use crate::application::session::{SessionSignal, SessionWatcher, TokenStore};
use crate::domain::error::DomainError;
use crate::domain::session::{AuthEvent, AuthState};

pub struct AuthGate {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    watcher: SessionWatcher,
    state: AuthState,
    session_expired: bool,
}

impl AuthGate {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>, signal: &SessionSignal) -> Self {
        Self {
            api,
            tokens,
            watcher: signal.subscribe(),
            state: AuthState::default(),
            session_expired: false,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// Resolve the mount state from the stored token.
    ///
    /// A 401 clears the token and raises the expired notice. Any other failure
    /// leaves the user signed out without the notice.
    pub async fn restore(&mut self) -> &AuthState {
        self.state = AuthState::Loading;

        let token = match self.tokens.load() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "failed to read stored session token");
                None
            }
        };

        let event = match token {
            None => {
                debug!("no stored session token");
                AuthEvent::NoSession
            }
            Some(_) => match self.api.me().await {
                Ok(user) => AuthEvent::Restored(user),
                Err(err) if err.is_unauthorized() => {
                    info!("stored session token rejected, clearing it");
                    self.clear_token();
                    self.session_expired = true;
                    AuthEvent::Expired
                }
                Err(err) => {
                    warn!(error = %err, "failed to restore session");
                    AuthEvent::NoSession
                }
            },
        };

        // The 401 above already went through the signal.
        self.watcher.take_expired();
        self.transition_or_reset(event);
        &self.state
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&User, ActionError> {
        if username.trim().is_empty() {
            return Err(DomainError::required("username").into());
        }
        if password.is_empty() {
            return Err(DomainError::required("password").into());
        }

        let pair = self
            .api
            .login(&LoginRequest {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.tokens.save(&pair.access)?;

        let user = self.api.me().await?;
        info!(user_id = user.id, username = %user.username, "logged in");

        self.watcher.take_expired();
        self.session_expired = false;
        self.transition(AuthEvent::LoggedIn(user))?;
        self.state.user().ok_or(ActionError::NotAuthenticated)
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&User, ActionError> {
        for (field, value) in [("username", username), ("email", email), ("password", password)] {
            if value.trim().is_empty() {
                return Err(DomainError::required(field).into());
            }
        }

        self.api
            .register(&RegisterRequest {
                username: username.trim().to_string(),
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        info!(username = %username.trim(), "registered");

        self.login(username, password).await
    }

    pub fn logout(&mut self) {
        self.clear_token();
        self.watcher.take_expired();
        self.session_expired = false;
        self.transition_or_reset(AuthEvent::LoggedOut);
        info!("logged out");
    }

    /// Apply an expiry raised since the last check. Returns whether one was pending.
    pub fn observe_expiry(&mut self) -> bool {
        if self.watcher.take_expired() {
            self.expire();
            true
        } else {
            false
        }
    }

    /// Wait for the next expiry and apply it. Returns `false` once the signal is gone.
    pub async fn expired(&mut self) -> bool {
        if self.watcher.expired().await {
            self.expire();
            true
        } else {
            false
        }
    }

    pub fn clear_session_expired(&mut self) {
        self.session_expired = false;
    }

    fn expire(&mut self) {
        self.clear_token();
        self.session_expired = true;
        self.transition_or_reset(AuthEvent::Expired);
        warn!("session expired, please log in again");
    }

    fn clear_token(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to delete stored session token");
        }
    }

    fn transition(&mut self, event: AuthEvent) -> Result<(), DomainError> {
        let next = self.state.clone().apply(event)?;
        debug!(from = self.state.label(), to = next.label(), "auth state changed");
        self.state = next;
        Ok(())
    }

    fn transition_or_reset(&mut self, event: AuthEvent) {
        if let Err(err) = self.transition(event) {
            warn!(error = %err, "unexpected auth transition, signing out");
            self.state = AuthState::Unauthenticated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApiError;
    use crate::application::testing::{FakeBackend, unauthorized, user_json};
    use crate::infra::session_store::MemoryTokenStore;
    use serde_json::json;

    fn gate(
        backend: Arc<FakeBackend>,
        tokens: Arc<MemoryTokenStore>,
        signal: &SessionSignal,
    ) -> AuthGate {
        AuthGate::new(backend, tokens, signal)
    }

    #[tokio::test]
    async fn restore_without_token_is_unauthenticated() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        let mut gate = gate(backend.clone(), Arc::new(MemoryTokenStore::new()), &signal);

        assert!(gate.state().is_loading());
        assert_eq!(gate.restore().await, &AuthState::Unauthenticated);
        assert!(!gate.session_expired());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn restore_with_valid_token_authenticates() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.reply("me", user_json(1, "ada"));
        let mut gate = gate(backend, Arc::new(MemoryTokenStore::with_token("t")), &signal);

        gate.restore().await;
        assert_eq!(gate.user().map(|u| u.username.as_str()), Some("ada"));
    }

    #[tokio::test]
    async fn restore_with_rejected_token_flags_expiry_and_clears_it() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::with_signal(signal.clone()));
        backend.fail("me", unauthorized());
        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let mut gate = gate(backend, tokens.clone(), &signal);

        assert_eq!(gate.restore().await, &AuthState::Unauthenticated);
        assert!(gate.session_expired());
        assert_eq!(tokens.load().expect("load"), None);
        assert!(!gate.observe_expiry());
    }

    #[tokio::test]
    async fn restore_server_error_signs_out_without_notice() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.fail("me", ApiError::server(500, None));
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let mut gate = gate(backend, tokens.clone(), &signal);

        gate.restore().await;
        assert!(!gate.is_authenticated());
        assert!(!gate.session_expired());
        assert_eq!(tokens.load().expect("load"), Some("t".to_string()));
    }

    #[tokio::test]
    async fn login_stores_token_and_authenticates() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.reply("login", json!({"access": "access-1", "refresh": "r"}));
        backend.reply("me", user_json(4, "grace"));
        let tokens = Arc::new(MemoryTokenStore::new());
        let mut gate = gate(backend.clone(), tokens.clone(), &signal);
        gate.restore().await;

        let user = gate.login("grace", "secret").await.expect("login");
        assert_eq!(user.id, 4);
        assert!(gate.is_authenticated());
        assert_eq!(tokens.load().expect("load"), Some("access-1".to_string()));
        assert_eq!(
            backend.requests("login"),
            vec![json!({"username": "grace", "password": "secret"})]
        );
    }

    #[tokio::test]
    async fn failed_login_keeps_gate_signed_out() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.fail(
            "login",
            ApiError::Unauthorized {
                detail: Some("No active account found with the given credentials".into()),
            },
        );
        let tokens = Arc::new(MemoryTokenStore::new());
        let mut gate = gate(backend, tokens.clone(), &signal);
        gate.restore().await;

        let err = gate.login("grace", "wrong").await.expect_err("rejected");
        assert_eq!(
            err.user_message("Login failed"),
            "No active account found with the given credentials"
        );
        assert!(!gate.is_authenticated());
        assert!(!gate.session_expired());
        assert_eq!(tokens.load().expect("load"), None);
    }

    #[tokio::test]
    async fn register_then_logs_in() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.reply("register", json!(null));
        backend.reply("login", json!({"access": "fresh"}));
        backend.reply("me", user_json(9, "linus"));
        let mut gate = gate(backend.clone(), Arc::new(MemoryTokenStore::new()), &signal);
        gate.restore().await;

        gate.register("linus", "linus@example.com", "penguins!")
            .await
            .expect("register");
        assert_eq!(backend.calls(), vec!["register", "login", "me"]);
        assert!(gate.is_authenticated());
    }

    #[tokio::test]
    async fn signal_from_any_request_expires_the_session() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.reply("me", user_json(1, "ada"));
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let mut gate = gate(backend, tokens.clone(), &signal);
        gate.restore().await;
        assert!(gate.is_authenticated());

        signal.notify_expired();
        assert!(gate.observe_expiry());
        assert!(!gate.is_authenticated());
        assert!(gate.session_expired());
        assert_eq!(tokens.load().expect("load"), None);

        gate.clear_session_expired();
        assert!(!gate.session_expired());
    }

    #[tokio::test]
    async fn logout_clears_token_user_and_notice() {
        let signal = SessionSignal::new();
        let backend = Arc::new(FakeBackend::new());
        backend.reply("me", user_json(1, "ada"));
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let mut gate = gate(backend, tokens.clone(), &signal);
        gate.restore().await;

        signal.notify_expired();
        gate.logout();
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert!(!gate.session_expired());
        assert!(!gate.observe_expiry());
        assert_eq!(tokens.load().expect("load"), None);
    }
}
