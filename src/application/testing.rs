//! Scripted in-memory backend shared by the service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use devlink_api_types::{
    Acknowledgement, AnalyticsReport, Business, Campaign, CampaignCreated,
    CampaignFromBusinessesRequest, CampaignId, CampaignRequest, ChangePasswordRequest,
    EmailTemplate, GenerateBulkEmailRequest, GenerateEmailRequest, GeneratedEmail, GmailAuthUrl,
    GmailSendResponse, GmailStatus, HistoryPage, LoginRequest, NewBusiness, ProfileUpdateRequest,
    RegisterRequest, SendEmailRequest, SendEmailResponse, TemplateId, TemplateRequest, TokenPair,
    User, UserProfile, UserStats,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::backend::{AiApi, AuthApi, BusinessApi, EmailApi, GmailApi, ImageUpload};
use super::error::ApiError;
use super::session::SessionSignal;

/// Every call is recorded as `(operation, request JSON)`; replies come from
/// per-operation queues, falling back to a sticky reply when the queue is empty.
#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: Mutex<Vec<(String, Value)>>,
    queued: Mutex<HashMap<String, Vec<Result<Value, ApiError>>>>,
    sticky: Mutex<HashMap<String, Result<Value, ApiError>>>,
    signal: Option<SessionSignal>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Raise the signal on every scripted 401, like the HTTP client does.
    pub(crate) fn with_signal(signal: SessionSignal) -> Self {
        Self {
            signal: Some(signal),
            ..Self::default()
        }
    }

    pub(crate) fn reply(&self, op: &str, value: Value) {
        self.sticky
            .lock()
            .expect("sticky lock")
            .insert(op.to_string(), Ok(value));
    }

    pub(crate) fn fail(&self, op: &str, err: ApiError) {
        self.sticky
            .lock()
            .expect("sticky lock")
            .insert(op.to_string(), Err(err));
    }

    pub(crate) fn reply_once(&self, op: &str, reply: Result<Value, ApiError>) {
        self.queued
            .lock()
            .expect("queue lock")
            .entry(op.to_string())
            .or_default()
            .push(reply);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(op, _)| op.clone())
            .collect()
    }

    pub(crate) fn requests(&self, op: &str) -> Vec<Value> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .filter(|(name, _)| name == op)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn respond<T: DeserializeOwned>(
        &self,
        op: &str,
        request: impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(request).expect("serialize request");
        self.calls
            .lock()
            .expect("calls lock")
            .push((op.to_string(), body));

        let queued = {
            let mut queued = self.queued.lock().expect("queue lock");
            queued
                .get_mut(op)
                .filter(|replies| !replies.is_empty())
                .map(|replies| replies.remove(0))
        };
        let reply = match queued {
            Some(reply) => reply,
            None => self
                .sticky
                .lock()
                .expect("sticky lock")
                .get(op)
                .cloned()
                .unwrap_or_else(|| Err(ApiError::transport(format!("no reply scripted for {op}")))),
        };

        match reply {
            Ok(value) => serde_json::from_value(value).map_err(ApiError::decode),
            Err(err) => {
                if err.is_unauthorized() {
                    if let Some(signal) = &self.signal {
                        signal.notify_expired();
                    }
                }
                Err(err)
            }
        }
    }
}

pub(crate) fn user_json(id: i64, username: &str) -> Value {
    json!({"id": id, "username": username, "email": format!("{username}@example.com")})
}

pub(crate) fn business_json(id: i64, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "category": "restaurant",
        "country": "Italy",
        "city": "Pisa"
    })
}

pub(crate) fn unauthorized() -> ApiError {
    ApiError::Unauthorized {
        detail: Some("Given token not valid for any token type".to_string()),
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.respond("register", request)
    }

    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        self.respond("login", request)
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.respond("me", Value::Null)
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.respond("profile", Value::Null)
    }

    async fn update_profile(
        &self,
        update: &ProfileUpdateRequest,
        image: Option<ImageUpload>,
    ) -> Result<UserProfile, ApiError> {
        let mut body = serde_json::to_value(update).expect("serialize update");
        if let (Some(image), Value::Object(map)) = (image, &mut body) {
            map.insert("work_image".to_string(), Value::String(image.file_name));
        }
        self.respond("update_profile", body)
    }

    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Acknowledgement, ApiError> {
        self.respond("change_password", request)
    }

    async fn stats(&self) -> Result<UserStats, ApiError> {
        self.respond("stats", Value::Null)
    }
}

#[async_trait]
impl BusinessApi for FakeBackend {
    async fn search(&self, filters: &Value) -> Result<Vec<Business>, ApiError> {
        self.respond("search", filters)
    }

    async fn list(&self, params: &[(&'static str, String)]) -> Result<Vec<Business>, ApiError> {
        let map = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();
        self.respond("list_businesses", map)
    }

    async fn create(&self, business: &NewBusiness) -> Result<Business, ApiError> {
        self.respond("create_business", business)
    }
}

#[async_trait]
impl EmailApi for FakeBackend {
    async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, ApiError> {
        self.respond("send", request)
    }

    async fn history(&self, page: u32, page_size: u32) -> Result<HistoryPage, ApiError> {
        self.respond("history", json!({"page": page, "page_size": page_size}))
    }

    async fn templates(&self) -> Result<Vec<EmailTemplate>, ApiError> {
        self.respond("templates", Value::Null)
    }

    async fn create_template(
        &self,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate, ApiError> {
        self.respond("create_template", request)
    }

    async fn update_template(
        &self,
        id: TemplateId,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate, ApiError> {
        self.respond("update_template", json!({"id": id, "request": request}))
    }

    async fn delete_template(&self, id: TemplateId) -> Result<(), ApiError> {
        self.respond("delete_template", json!({"id": id}))
    }

    async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError> {
        self.respond("campaigns", Value::Null)
    }

    async fn create_campaign(&self, request: &CampaignRequest) -> Result<Campaign, ApiError> {
        self.respond("create_campaign", request)
    }

    async fn update_campaign(
        &self,
        id: CampaignId,
        request: &CampaignRequest,
    ) -> Result<Campaign, ApiError> {
        self.respond("update_campaign", json!({"id": id, "request": request}))
    }

    async fn delete_campaign(&self, id: CampaignId) -> Result<(), ApiError> {
        self.respond("delete_campaign", json!({"id": id}))
    }

    async fn send_campaign(&self, id: CampaignId) -> Result<Acknowledgement, ApiError> {
        self.respond("send_campaign", json!({"id": id}))
    }

    async fn campaign_from_businesses(
        &self,
        request: &CampaignFromBusinessesRequest,
    ) -> Result<CampaignCreated, ApiError> {
        self.respond("campaign_from_businesses", request)
    }

    async fn analytics(&self, days: u32) -> Result<AnalyticsReport, ApiError> {
        self.respond("analytics", json!({"days": days}))
    }

    async fn refresh_analytics(&self) -> Result<Acknowledgement, ApiError> {
        self.respond("refresh_analytics", Value::Null)
    }
}

#[async_trait]
impl AiApi for FakeBackend {
    async fn generate_email(
        &self,
        request: &GenerateEmailRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.respond("generate_email", request)
    }

    async fn generate_bulk_email(
        &self,
        request: &GenerateBulkEmailRequest,
    ) -> Result<GeneratedEmail, ApiError> {
        self.respond("generate_bulk_email", request)
    }
}

#[async_trait]
impl GmailApi for FakeBackend {
    async fn status(&self) -> Result<GmailStatus, ApiError> {
        self.respond("gmail_status", Value::Null)
    }

    async fn auth_url(&self) -> Result<GmailAuthUrl, ApiError> {
        self.respond("gmail_auth_url", Value::Null)
    }

    async fn disconnect(&self) -> Result<Acknowledgement, ApiError> {
        self.respond("gmail_disconnect", Value::Null)
    }

    async fn send(&self, request: &SendEmailRequest) -> Result<GmailSendResponse, ApiError> {
        self.respond("gmail_send", request)
    }
}
