use std::sync::Arc;

use devlink_api_types::{Campaign, CampaignId, CampaignRequest};
use tracing::{info, warn};

use crate::application::backend::EmailApi;
use crate::application::error::{ActionError, ApiError};
use crate::application::toasts::ToastQueue;
use crate::domain::error::DomainError;

pub struct CampaignManager {
    api: Arc<dyn EmailApi>,
    toasts: ToastQueue,
    campaigns: Vec<Campaign>,
}

impl CampaignManager {
    pub fn new(api: Arc<dyn EmailApi>, toasts: ToastQueue) -> Self {
        Self {
            api,
            toasts,
            campaigns: Vec::new(),
        }
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|campaign| campaign.id == id)
    }

    pub async fn load(&mut self) -> Result<&[Campaign], ActionError> {
        match self.api.campaigns().await {
            Ok(campaigns) => {
                info!(count = campaigns.len(), "campaigns loaded");
                self.campaigns = campaigns;
                Ok(&self.campaigns)
            }
            Err(err) => {
                warn!(error = %err, "failed to load campaigns");
                self.toasts.error(err.user_message("Failed to load campaigns"));
                Err(err.into())
            }
        }
    }

    pub async fn create(&mut self, request: CampaignRequest) -> Result<Campaign, ActionError> {
        validate(&request)?;
        let result = self.api.create_campaign(&request).await;
        self.after_save(result, "Campaign created successfully!").await
    }

    /// Only drafts can be edited; campaigns not loaded yet are left to the backend.
    pub async fn update(
        &mut self,
        id: CampaignId,
        request: CampaignRequest,
    ) -> Result<Campaign, ActionError> {
        self.ensure_draft(id, "edited")?;
        validate(&request)?;
        let result = self.api.update_campaign(id, &request).await;
        self.after_save(result, "Campaign updated successfully!").await
    }

    pub async fn delete(&mut self, id: CampaignId) -> Result<(), ActionError> {
        self.ensure_draft(id, "deleted")?;
        match self.api.delete_campaign(id).await {
            Ok(()) => {
                info!(campaign_id = id, "campaign deleted");
                self.toasts.success("Campaign deleted successfully!");
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, campaign_id = id, "failed to delete campaign");
                self.toasts.error(err.user_message("Failed to delete campaign"));
                Err(err.into())
            }
        }
    }

    pub async fn send(&mut self, id: CampaignId) -> Result<(), ActionError> {
        self.ensure_draft(id, "sent")?;
        match self.api.send_campaign(id).await {
            Ok(ack) => {
                info!(
                    campaign_id = id,
                    detail = ack.text().unwrap_or(""),
                    "campaign sending started"
                );
                self.toasts.success("Campaign sending started!");
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, campaign_id = id, "failed to start campaign");
                self.toasts.error(err.user_message("Failed to start campaign"));
                Err(err.into())
            }
        }
    }

    fn ensure_draft(&self, id: CampaignId, action: &str) -> Result<(), DomainError> {
        match self.get(id) {
            Some(campaign) if !campaign.is_sendable() => Err(DomainError::validation(format!(
                "Only draft campaigns can be {action} (campaign is {})",
                campaign.status
            ))),
            Some(_) | None => Ok(()),
        }
    }

    async fn after_save(
        &mut self,
        result: Result<Campaign, ApiError>,
        success: &str,
    ) -> Result<Campaign, ActionError> {
        match result {
            Ok(campaign) => {
                info!(campaign_id = campaign.id, name = %campaign.name, "campaign saved");
                self.toasts.success(success);
                self.reload().await;
                Ok(campaign)
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to save campaign"));
                Err(err.into())
            }
        }
    }

    async fn reload(&mut self) {
        // `load` already reports its own failure.
        let _ = self.load().await;
    }
}

fn validate(request: &CampaignRequest) -> Result<(), DomainError> {
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
