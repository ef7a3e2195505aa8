#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;
use std::time::Duration;

use devlink::application::auth::AuthGate;
use devlink::application::error::AppError;
use devlink::application::session::{SessionSignal, TokenStore};
use devlink::application::toasts::ToastQueue;
use devlink::config::Settings;
use devlink::infra::http::ApiClient;
use devlink::infra::session_store::FileTokenStore;

pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please log in again.";

/// Everything one command needs: the backend client, the session gate and the
/// toast queue that is flushed to stderr when the command finishes. Toasts are
/// sticky here so none expire before `finish` prints them.
pub struct Ctx {
    pub client: Arc<ApiClient>,
    pub toasts: ToastQueue,
    pub gate: AuthGate,
}

impl Ctx {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(settings.session.token_file.clone()));
        let signal = SessionSignal::new();
        let client = Arc::new(ApiClient::new(
            settings.api.base_url.clone(),
            tokens.clone(),
            signal.clone(),
        )?);
        let gate = AuthGate::new(client.clone(), tokens, &signal);

        Ok(Self {
            client,
            toasts: ToastQueue::new(Duration::ZERO),
            gate,
        })
    }

    /// Flush pending toasts and surface a session expiry raised while the
    /// command ran.
    pub fn finish(&mut self) -> Result<(), AppError> {
        for toast in self.toasts.drain() {
            eprintln!("{toast}");
        }

        if self.gate.observe_expiry() || self.gate.session_expired() {
            eprintln!("{SESSION_EXPIRED_NOTICE}");
            return Err(AppError::SessionExpired);
        }
        Ok(())
    }
}
