use std::sync::Arc;

use devlink_api_types::{EmailTemplate, TemplateId, TemplateRequest};
use tracing::{info, warn};

use crate::application::backend::EmailApi;
use crate::application::error::{ActionError, ApiError};
use crate::application::toasts::ToastQueue;
use crate::domain::error::DomainError;

pub struct TemplateManager {
    api: Arc<dyn EmailApi>,
    toasts: ToastQueue,
    templates: Vec<EmailTemplate>,
}

impl TemplateManager {
    pub fn new(api: Arc<dyn EmailApi>, toasts: ToastQueue) -> Self {
        Self {
            api,
            toasts,
            templates: Vec::new(),
        }
    }

    pub fn templates(&self) -> &[EmailTemplate] {
        &self.templates
    }

    pub fn get(&self, id: TemplateId) -> Option<&EmailTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    pub async fn load(&mut self) -> Result<&[EmailTemplate], ActionError> {
        match self.api.templates().await {
            Ok(templates) => {
                info!(count = templates.len(), "templates loaded");
                self.templates = templates;
                Ok(&self.templates)
            }
            Err(err) => {
                warn!(error = %err, "failed to load templates");
                self.toasts.error(err.user_message("Failed to load templates"));
                Err(err.into())
            }
        }
    }

    pub async fn create(
        &mut self,
        request: TemplateRequest,
    ) -> Result<EmailTemplate, ActionError> {
        validate(&request)?;
        let result = self.api.create_template(&request).await;
        self.after_save(result, "Template created successfully!").await
    }

    pub async fn update(
        &mut self,
        id: TemplateId,
        request: TemplateRequest,
    ) -> Result<EmailTemplate, ActionError> {
        validate(&request)?;
        let result = self.api.update_template(id, &request).await;
        self.after_save(result, "Template updated successfully!").await
    }

    pub async fn delete(&mut self, id: TemplateId) -> Result<(), ActionError> {
        match self.api.delete_template(id).await {
            Ok(()) => {
                info!(template_id = id, "template deleted");
                self.toasts.success("Template deleted successfully!");
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, template_id = id, "failed to delete template");
                self.toasts.error(err.user_message("Failed to delete template"));
                Err(err.into())
            }
        }
    }

    /// Pick a loaded template for composing.
    pub fn use_template(&self, id: TemplateId) -> Result<&EmailTemplate, ActionError> {
        let template = self.get(id).ok_or(ActionError::NotLoaded {
            entity: "template",
            id,
        })?;
        self.toasts
            .success(format!("Template \"{}\" selected for use", template.name));
        Ok(template)
    }

    async fn after_save(
        &mut self,
        result: Result<EmailTemplate, ApiError>,
        success: &str,
    ) -> Result<EmailTemplate, ActionError> {
        match result {
            Ok(template) => {
                info!(template_id = template.id, name = %template.name, "template saved");
                self.toasts.success(success);
                self.reload().await;
                Ok(template)
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to save template"));
                Err(err.into())
            }
        }
    }

    async fn reload(&mut self) {
        // `load` already reports its own failure.
        let _ = self.load().await;
    }
}

fn validate(request: &TemplateRequest) -> Result<(), DomainError> {
    for (field, value) in [
        ("name", &request.name),
        ("subject", &request.subject),
        ("body", &request.body),
    ] {
        if value.trim().is_empty() {
            return Err(DomainError::required(field));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeBackend;
    use crate::domain::toast::ToastKind;
    use serde_json::{Value, json};

    fn template_json(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "subject": "Hello",
            "body": "Body",
            "category": "general",
            "is_default": false,
            "created_at": "2025-04-01T09:00:00Z",
            "updated_at": "2025-04-02T09:00:00Z"
        })
    }

    fn request(name: &str) -> TemplateRequest {
        TemplateRequest {
            name: name.to_string(),
            subject: "Hello".into(),
            body: "Body".into(),
            category: "general".into(),
            is_default: false,
        }
    }

    fn messages(toasts: &ToastQueue) -> Vec<(ToastKind, String)> {
        toasts
            .snapshot()
            .into_iter()
            .map(|t| (t.kind, t.message))
            .collect()
    }

    #[tokio::test]
    async fn load_failure_without_detail_uses_fallback() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("templates", ApiError::server(500, None));
        let toasts = ToastQueue::default();
        let mut manager = TemplateManager::new(backend, toasts.clone());

        assert!(manager.load().await.is_err());
        assert_eq!(
            messages(&toasts),
            vec![(ToastKind::Error, "Failed to load templates".to_string())]
        );
    }

    #[tokio::test]
    async fn create_toasts_and_reloads() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("create_template", template_json(7, "Intro"));
        backend.reply("templates", json!([template_json(7, "Intro")]));
        let toasts = ToastQueue::default();
        let mut manager = TemplateManager::new(backend.clone(), toasts.clone());

        manager.create(request("Intro")).await.expect("created");
        assert_eq!(backend.calls(), vec!["create_template", "templates"]);
        assert_eq!(manager.templates().len(), 1);
        assert_eq!(
            messages(&toasts),
            vec![(ToastKind::Success, "Template created successfully!".to_string())]
        );
    }

    #[tokio::test]
    async fn save_failure_prefers_backend_detail() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail(
            "update_template",
            ApiError::server(400, Some("name: This field may not be blank.".into())),
        );
        let toasts = ToastQueue::default();
        let mut manager = TemplateManager::new(backend, toasts.clone());

        assert!(manager.update(7, request("Intro")).await.is_err());
        assert_eq!(toasts.snapshot()[0].message, "name: This field may not be blank.");
    }

    #[tokio::test]
    async fn blank_name_is_rejected_locally() {
        let backend = Arc::new(FakeBackend::new());
        let mut manager = TemplateManager::new(backend.clone(), ToastQueue::default());

        let err = manager.create(request("  ")).await.expect_err("invalid");
        assert_eq!(err, ActionError::Domain(DomainError::required("name")));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn delete_and_load_failures_show_backend_detail() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("delete_template", ApiError::server(404, Some("Not found.".into())));
        backend.fail(
            "templates",
            ApiError::server(503, Some("Template store offline".into())),
        );
        let toasts = ToastQueue::default();
        let mut manager = TemplateManager::new(backend, toasts.clone());

        assert!(manager.delete(3).await.is_err());
        assert!(manager.load().await.is_err());
        assert_eq!(
            messages(&toasts),
            vec![
                (ToastKind::Error, "Not found.".to_string()),
                (ToastKind::Error, "Template store offline".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn use_template_requires_it_loaded() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("templates", json!([template_json(2, "Follow-up")]));
        let toasts = ToastQueue::default();
        let mut manager = TemplateManager::new(backend, toasts.clone());

        assert!(manager.use_template(2).is_err());
        manager.load().await.expect("load");
        assert_eq!(manager.use_template(2).expect("found").name, "Follow-up");
        assert_eq!(
            toasts.snapshot()[0].message,
            "Template \"Follow-up\" selected for use"
        );
    }
}
