//! Ports describing the remote backend, one trait per API area.
//!
//! The HTTP adapter in `infra::http` implements all of them; services only see
//! the slice they need, which keeps fakes small in tests.

use async_trait::async_trait;
use devlink_api_types::{
    Acknowledgement, AnalyticsReport, Business, Campaign, CampaignCreated,
    CampaignFromBusinessesRequest, CampaignId, CampaignRequest, ChangePasswordRequest,
    EmailTemplate, GenerateBulkEmailRequest, GenerateEmailRequest, GeneratedEmail, GmailAuthUrl,
    GmailSendResponse, GmailStatus, HistoryPage, LoginRequest, NewBusiness, ProfileUpdateRequest,
    RegisterRequest, SendEmailRequest, SendEmailResponse, TemplateId, TemplateRequest, TokenPair,
    User, UserProfile, UserStats,
};
use serde_json::Value;

use super::error::ApiError;

/// Image attached to a profile update, sent as the `work_image` multipart part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError>;
    async fn me(&self) -> Result<User, ApiError>;
    async fn profile(&self) -> Result<UserProfile, ApiError>;
    async fn update_profile(
        &self,
        update: &ProfileUpdateRequest,
        image: Option<ImageUpload>,
    ) -> Result<UserProfile, ApiError>;
    async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Acknowledgement, ApiError>;
    async fn stats(&self) -> Result<UserStats, ApiError>;
}

#[async_trait]
pub trait BusinessApi: Send + Sync {
    /// Discovery search; `filters` only carries non-empty fields.
    async fn search(&self, filters: &Value) -> Result<Vec<Business>, ApiError>;
    async fn list(&self, params: &[(&'static str, String)]) -> Result<Vec<Business>, ApiError>;
    async fn create(&self, business: &NewBusiness) -> Result<Business, ApiError>;
}

#[async_trait]
pub trait EmailApi: Send + Sync {
    async fn send(&self, request: &SendEmailRequest) -> Result<SendEmailResponse, ApiError>;
    async fn history(&self, page: u32, page_size: u32) -> Result<HistoryPage, ApiError>;

    async fn templates(&self) -> Result<Vec<EmailTemplate>, ApiError>;
    async fn create_template(&self, request: &TemplateRequest)
    -> Result<EmailTemplate, ApiError>;
    async fn update_template(
        &self,
        id: TemplateId,
        request: &TemplateRequest,
    ) -> Result<EmailTemplate, ApiError>;
    async fn delete_template(&self, id: TemplateId) -> Result<(), ApiError>;

    async fn campaigns(&self) -> Result<Vec<Campaign>, ApiError>;
    async fn create_campaign(&self, request: &CampaignRequest) -> Result<Campaign, ApiError>;
    async fn update_campaign(
        &self,
        id: CampaignId,
        request: &CampaignRequest,
    ) -> Result<Campaign, ApiError>;
    async fn delete_campaign(&self, id: CampaignId) -> Result<(), ApiError>;
    async fn send_campaign(&self, id: CampaignId) -> Result<Acknowledgement, ApiError>;
    async fn campaign_from_businesses(
        &self,
        request: &CampaignFromBusinessesRequest,
    ) -> Result<CampaignCreated, ApiError>;

    async fn analytics(&self, days: u32) -> Result<AnalyticsReport, ApiError>;
    async fn refresh_analytics(&self) -> Result<Acknowledgement, ApiError>;
}

#[async_trait]
pub trait AiApi: Send + Sync {
    async fn generate_email(
        &self,
        request: &GenerateEmailRequest,
    ) -> Result<GeneratedEmail, ApiError>;
    async fn generate_bulk_email(
        &self,
        request: &GenerateBulkEmailRequest,
    ) -> Result<GeneratedEmail, ApiError>;
}

#[async_trait]
pub trait GmailApi: Send + Sync {
    async fn status(&self) -> Result<GmailStatus, ApiError>;
    async fn auth_url(&self) -> Result<GmailAuthUrl, ApiError>;
    async fn disconnect(&self) -> Result<Acknowledgement, ApiError>;
    async fn send(&self, request: &SendEmailRequest) -> Result<GmailSendResponse, ApiError>;
}
