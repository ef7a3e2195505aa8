//! The "send email" form, optionally pre-filled from a business card.

use std::sync::Arc;

use devlink_api_types::ai::{DEFAULT_DEVELOPER_NAME, DEFAULT_DEVELOPER_SERVICES};
use devlink_api_types::{Business, GenerateBulkEmailRequest, GenerateEmailRequest, GeneratedEmail};
use tracing::{info, warn};

use crate::application::backend::{AiApi, EmailApi};
use crate::application::error::{ActionError, ApiError};
use crate::domain::compose::build_send_request;

const SEND_FAILED: &str = "Failed to send email";
const GENERATE_FAILED: &str = "Failed to generate with AI";

pub struct EmailComposer {
    emails: Arc<dyn EmailApi>,
    ai: Arc<dyn AiApi>,
    recipients: String,
    subject: String,
    body: String,
    business_name: String,
    business_category: String,
    developer_name: String,
    developer_services: String,
    error: Option<String>,
    success: Option<String>,
}

impl EmailComposer {
    pub fn new(emails: Arc<dyn EmailApi>, ai: Arc<dyn AiApi>) -> Self {
        Self {
            emails,
            ai,
            recipients: String::new(),
            subject: String::new(),
            body: String::new(),
            business_name: String::new(),
            business_category: String::new(),
            developer_name: DEFAULT_DEVELOPER_NAME.to_string(),
            developer_services: DEFAULT_DEVELOPER_SERVICES.to_string(),
            error: None,
            success: None,
        }
    }

    /// Start a fresh message addressed to `business`.
    pub fn open_for(&mut self, business: &Business) {
        self.reset();
        self.recipients = business.email.trim().to_string();
        self.business_name = business.name.clone();
        self.business_category = business.category.clone();
    }

    /// Clear the form, keeping the developer details.
    pub fn reset(&mut self) {
        self.recipients.clear();
        self.subject.clear();
        self.body.clear();
        self.business_name.clear();
        self.business_category.clear();
        self.error = None;
        self.success = None;
    }

    pub fn set_recipients(&mut self, value: impl Into<String>) {
        self.recipients = value.into();
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.subject = value.into();
    }

    pub fn set_body(&mut self, value: impl Into<String>) {
        self.body = value.into();
    }

    pub fn set_business(&mut self, name: impl Into<String>, category: impl Into<String>) {
        self.business_name = name.into();
        self.business_category = category.into();
    }

    pub fn set_developer(&mut self, name: impl Into<String>, services: impl Into<String>) {
        self.developer_name = name.into();
        self.developer_services = services.into();
    }

    /// Developer name and services used by the AI prompts.
    pub fn developer(&self) -> (&str, &str) {
        (&self.developer_name, &self.developer_services)
    }

    pub fn recipients(&self) -> &str {
        &self.recipients
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Send one message to every parsed recipient. Returns the recipient count.
    pub async fn send(&mut self) -> Result<usize, ActionError> {
        self.error = None;
        self.success = None;

        let request = match build_send_request(&self.subject, &self.body, &self.recipients) {
            Ok(request) => request,
            Err(err) => {
                self.error = Some(err.user_message());
                return Err(err.into());
            }
        };
        let count = request.recipients.len();

        match self.emails.send(&request).await {
            Ok(_) => {
                info!(recipients = count, "email sent");
                self.success = Some(format!("Sent to {count} recipient(s)"));
                self.subject.clear();
                self.body.clear();
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "email send failed");
                self.error = Some(err.user_message(SEND_FAILED));
                Err(err.into())
            }
        }
    }

    /// Ask the backend to draft subject and body for the current business.
    pub async fn generate(&mut self) -> Result<(), ActionError> {
        self.error = None;
        self.success = None;

        let request = GenerateEmailRequest {
            business_name: self.business_name.clone(),
            business_category: self.business_category.clone(),
            developer_name: or_default(&self.developer_name, DEFAULT_DEVELOPER_NAME),
            developer_services: or_default(&self.developer_services, DEFAULT_DEVELOPER_SERVICES),
        };
        let result = self.ai.generate_email(&request).await;
        self.apply_generated(result)
    }

    /// Draft a generic message for every business in `category`.
    pub async fn generate_bulk(&mut self, category: &str) -> Result<(), ActionError> {
        self.error = None;
        self.success = None;

        let request = GenerateBulkEmailRequest {
            category: category.trim().to_string(),
            developer_name: or_default(&self.developer_name, DEFAULT_DEVELOPER_NAME),
            developer_services: or_default(&self.developer_services, DEFAULT_DEVELOPER_SERVICES),
        };
        let result = self.ai.generate_bulk_email(&request).await;
        self.apply_generated(result)
    }

    fn apply_generated(
        &mut self,
        result: Result<GeneratedEmail, ApiError>,
    ) -> Result<(), ActionError> {
        match result {
            Ok(generated) => {
                info!(subject = %generated.subject, "email drafted");
                self.subject = generated.subject;
                self.body = generated.body;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "email generation failed");
                self.error = Some(err.user_message(GENERATE_FAILED));
                Err(err.into())
            }
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeBackend, business_json};
    use serde_json::json;

    fn composer(backend: &Arc<FakeBackend>) -> EmailComposer {
        EmailComposer::new(backend.clone(), backend.clone())
    }

    #[tokio::test]
    async fn comma_separated_recipients_produce_one_send() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("send", json!({"sent": 2}));
        let mut composer = composer(&backend);
        composer.set_recipients("a@x.com, b@y.com");
        composer.set_subject("Hello");
        composer.set_body("World");

        assert_eq!(composer.send().await.expect("sent"), 2);
        assert_eq!(
            backend.requests("send"),
            vec![json!({"subject": "Hello", "body": "World", "recipients": ["a@x.com", "b@y.com"]})]
        );
        assert_eq!(composer.success(), Some("Sent to 2 recipient(s)"));
        assert!(composer.subject().is_empty());
        assert!(composer.body().is_empty());
        assert_eq!(composer.recipients(), "a@x.com, b@y.com");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_backend() {
        let backend = Arc::new(FakeBackend::new());
        let mut composer = composer(&backend);
        composer.set_recipients(" , ");
        composer.set_subject("Hello");
        composer.set_body("World");

        assert!(composer.send().await.is_err());
        assert_eq!(composer.error(), Some("Add at least one recipient"));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn send_failure_keeps_the_draft() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("send", ApiError::server(500, None));
        let mut composer = composer(&backend);
        composer.set_recipients("a@x.com");
        composer.set_subject("Hello");
        composer.set_body("World");

        assert!(composer.send().await.is_err());
        assert_eq!(composer.error(), Some(SEND_FAILED));
        assert_eq!(composer.subject(), "Hello");
    }

    #[tokio::test]
    async fn generate_uses_business_context_and_defaults() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("generate_email", json!({"subject": "Ciao", "body": "Proposal"}));
        let mut composer = composer(&backend);
        let business = serde_json::from_value::<Business>(business_json(3, "Trattoria", "t@x.com"))
            .expect("business");
        composer.open_for(&business);
        composer.set_developer(" ", "");

        composer.generate().await.expect("generated");
        assert_eq!(composer.subject(), "Ciao");
        assert_eq!(composer.body(), "Proposal");
        assert_eq!(composer.recipients(), "t@x.com");
        assert_eq!(
            backend.requests("generate_email"),
            vec![json!({
                "business_name": "Trattoria",
                "business_category": "restaurant",
                "developer_name": "Developer",
                "developer_services": "Web development and digital solutions"
            })]
        );
    }

    #[tokio::test]
    async fn reset_clears_everything_but_developer_details() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("generate_email", ApiError::transport("offline"));
        let mut composer = composer(&backend);
        composer.set_developer("Ada", "Compilers");
        composer.set_recipients("a@x.com");
        assert!(composer.generate().await.is_err());
        assert_eq!(composer.error(), Some(GENERATE_FAILED));

        composer.reset();
        assert!(composer.recipients().is_empty());
        assert!(composer.error().is_none());
        assert_eq!(composer.developer_name, "Ada");
    }
}
