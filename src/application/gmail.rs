use std::sync::Arc;

use devlink_api_types::{GmailStatus, SendEmailRequest};
use tracing::{info, warn};

use crate::application::backend::GmailApi;
use crate::application::error::ActionError;
use crate::application::toasts::ToastQueue;

const NOT_CONFIGURED_MARKER: &str = "GMAIL_CLIENT_ID not configured";
const NOT_CONFIGURED_MESSAGE: &str = "Gmail integration is not configured. \
    Please contact your administrator to set up Gmail OAuth2 credentials.";
const TEST_SUBJECT: &str = "Test Email from DevLink";
const TEST_BODY: &str =
    "This is a test email to verify your Gmail integration is working correctly.";
const TEST_FALLBACK_RECIPIENT: &str = "test@example.com";

/// Connection state of the user's Gmail account used for sending.
pub struct GmailIntegration {
    api: Arc<dyn GmailApi>,
    toasts: ToastQueue,
    status: GmailStatus,
}

impl GmailIntegration {
    pub fn new(api: Arc<dyn GmailApi>, toasts: ToastQueue) -> Self {
        Self {
            api,
            toasts,
            status: GmailStatus::default(),
        }
    }

    pub fn status(&self) -> &GmailStatus {
        &self.status
    }

    pub async fn refresh_status(&mut self) -> Result<&GmailStatus, ActionError> {
        match self.api.status().await {
            Ok(status) => {
                info!(
                    connected = status.connected,
                    token_valid = status.token_valid,
                    "gmail status"
                );
                self.status = status;
                Ok(&self.status)
            }
            Err(err) => {
                warn!(error = %err, "failed to check gmail status");
                Err(err.into())
            }
        }
    }

    /// Authorization URL the user has to open to grant access.
    pub async fn connect(&self) -> Result<String, ActionError> {
        match self.api.auth_url().await {
            Ok(url) => Ok(url.auth_url),
            Err(err) => {
                let message = err.user_message("Failed to connect Gmail");
                if message.contains(NOT_CONFIGURED_MARKER) {
                    self.toasts.error(NOT_CONFIGURED_MESSAGE);
                } else {
                    self.toasts.error(message);
                }
                Err(err.into())
            }
        }
    }

    pub async fn disconnect(&mut self) -> Result<(), ActionError> {
        match self.api.disconnect().await {
            Ok(_) => {
                info!("gmail disconnected");
                self.toasts.success("Gmail disconnected successfully");
                self.status = GmailStatus::default();
                Ok(())
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to disconnect Gmail"));
                Err(err.into())
            }
        }
    }

    /// Send a fixed test message, to `recipient` or a placeholder address.
    pub async fn send_test(
        &self,
        recipient: Option<&str>,
    ) -> Result<Option<String>, ActionError> {
        let recipient = recipient
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(TEST_FALLBACK_RECIPIENT);
        let request = SendEmailRequest {
            subject: TEST_SUBJECT.to_string(),
            body: TEST_BODY.to_string(),
            recipients: vec![recipient.to_string()],
        };

        match self.api.send(&request).await {
            Ok(sent) => {
                let id = sent.gmail_message_id.unwrap_or_default();
                self.toasts.success(format!(
                    "Test email sent successfully! Gmail Message ID: {id}"
                ));
                Ok(Some(id).filter(|id| !id.is_empty()))
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to send test email"));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApiError;
    use crate::application::testing::FakeBackend;
    use serde_json::json;

    #[tokio::test]
    async fn missing_oauth_credentials_get_a_friendly_message() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail(
            "gmail_auth_url",
            ApiError::server(500, Some("GMAIL_CLIENT_ID not configured".into())),
        );
        let toasts = ToastQueue::default();
        let gmail = GmailIntegration::new(backend, toasts.clone());

        assert!(gmail.connect().await.is_err());
        assert_eq!(toasts.snapshot()[0].message, NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn connect_returns_the_authorization_url() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply(
            "gmail_auth_url",
            json!({"auth_url": "https://accounts.google.com/o/oauth2/auth?x=1"}),
        );
        let gmail = GmailIntegration::new(backend, ToastQueue::default());

        assert!(gmail.connect().await.expect("url").starts_with("https://accounts.google.com"));
    }

    #[tokio::test]
    async fn disconnect_resets_status() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply(
            "gmail_status",
            json!({"connected": true, "email": "me@gmail.com", "token_valid": true}),
        );
        backend.reply("gmail_disconnect", json!({"message": "Gmail disconnected successfully"}));
        let mut gmail = GmailIntegration::new(backend, ToastQueue::default());

        assert!(gmail.refresh_status().await.expect("status").connected);
        gmail.disconnect().await.expect("disconnect");
        assert_eq!(gmail.status(), &GmailStatus::default());
    }

    #[tokio::test]
    async fn test_send_defaults_recipient_and_reports_message_id() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("gmail_send", json!({"gmail_message_id": "18f0c"}));
        let toasts = ToastQueue::default();
        let gmail = GmailIntegration::new(backend.clone(), toasts.clone());

        let id = gmail.send_test(None).await.expect("sent");
        assert_eq!(id.as_deref(), Some("18f0c"));
        assert_eq!(
            backend.requests("gmail_send")[0]["recipients"],
            json!(["test@example.com"])
        );
        assert_eq!(
            toasts.snapshot()[0].message,
            "Test email sent successfully! Gmail Message ID: 18f0c"
        );
    }
}
