//! Request and response records exchanged with the DevLink backend.
//!
//! The backend owns every entity; these types only mirror the JSON shapes so
//! the client and the command-line surface agree on field names.

pub mod accounts;
pub mod ai;
pub mod businesses;
pub mod emails;
pub mod gmail;

pub use accounts::{
    ChangePasswordRequest, LoginRequest, ProfileDetails, ProfileUpdateRequest, RegisterRequest,
    TokenPair, User, UserProfile, UserStats,
};
pub use ai::{GenerateBulkEmailRequest, GenerateEmailRequest, GeneratedEmail};
pub use businesses::{Business, BusinessCategory, BusinessId, NewBusiness};
pub use emails::{
    AnalyticsDay, AnalyticsReport, AnalyticsSummary, Campaign, CampaignCreated,
    CampaignFromBusinessesRequest, CampaignId, CampaignRequest, CampaignStatus, DateRange,
    EmailLog, HistoryPage, SendEmailRequest, SendEmailResponse, StatusCount, TemplateId,
    TemplateRequest, TemplateUsage, EmailTemplate,
};
pub use gmail::{GmailAuthUrl, GmailSendResponse, GmailStatus};

/// Generic acknowledgement body (`{"detail": "..."}` or `{"message": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Acknowledgement {
    pub fn text(&self) -> Option<&str> {
        self.detail.as_deref().or(self.message.as_deref())
    }
}
