use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::businesses::Business;

pub type TemplateId = i64;
pub type CampaignId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SendEmailRequest {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendEmailResponse {
    #[serde(default)]
    pub sent: u64,
}

/// One entry of the send history. Recipients are stored comma separated.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailLog {
    pub id: i64,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub recipients: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl EmailLog {
    pub fn recipient_list(&self) -> Vec<&str> {
        self.recipients
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub results: Vec<EmailLog>,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
}

impl HistoryPage {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailTemplate {
    pub id: TemplateId,
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

fn default_template_category() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_template_category")]
    pub category: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<&EmailTemplate> for TemplateRequest {
    fn from(template: &EmailTemplate) -> Self {
        Self {
            name: template.name.clone(),
            subject: template.subject.clone(),
            body: template.body.clone(),
            category: template.category.clone(),
            is_default: template.is_default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Sending,
    Completed,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sending => "sending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Display for CampaignStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub recipients: Vec<serde_json::Value>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub sent_count: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub template_name: Option<String>,
}

impl Campaign {
    /// Whole-number send progress; zero when the campaign has no recipients.
    pub fn progress_percent(&self) -> u8 {
        if self.total_count == 0 {
            return 0;
        }
        let sent = self.sent_count.min(self.total_count);
        let pct = (sent * 100 + self.total_count / 2) / self.total_count;
        u8::try_from(pct).unwrap_or(100)
    }

    pub fn is_sendable(&self) -> bool {
        self.status == CampaignStatus::Draft
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CampaignRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub recipients: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateId>,
}

impl From<&Campaign> for CampaignRequest {
    fn from(campaign: &Campaign) -> Self {
        Self {
            name: campaign.name.clone(),
            subject: campaign.subject.clone(),
            body: campaign.body.clone(),
            recipients: campaign.recipients.clone(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CampaignFromBusinessesRequest {
    pub businesses: Vec<Business>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CampaignCreated {
    #[serde(default)]
    pub detail: Option<String>,
    pub campaign_id: CampaignId,
    #[serde(default)]
    pub recipients_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
    pub days: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_emails: u64,
    #[serde(default)]
    pub total_campaigns: u64,
    #[serde(default)]
    pub templates_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsDay {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub emails_sent: u64,
    #[serde(default)]
    pub unique_recipients: u64,
    #[serde(default)]
    pub templates_used: u64,
    #[serde(default)]
    pub campaigns_completed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateUsage {
    pub name: String,
    #[serde(default)]
    pub usage_count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusCount {
    pub status: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsReport {
    pub date_range: DateRange,
    #[serde(default)]
    pub summary: AnalyticsSummary,
    #[serde(default)]
    pub analytics: Vec<AnalyticsDay>,
    #[serde(default)]
    pub top_templates: Vec<TemplateUsage>,
    #[serde(default)]
    pub status_breakdown: Vec<StatusCount>,
}
