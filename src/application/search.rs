//! Business discovery screen: filters, results and bulk selection.

use std::sync::Arc;

use devlink_api_types::{
    Business, BusinessId, CampaignCreated, CampaignFromBusinessesRequest, NewBusiness,
};
use tracing::{info, warn};

use crate::application::backend::{BusinessApi, EmailApi};
use crate::application::error::ActionError;
use crate::application::toasts::ToastQueue;
use crate::domain::error::DomainError;
use crate::domain::search::{FilterField, SearchFilters, Selection};

pub const EMPTY_RESULTS_MESSAGE: &str =
    "No businesses found. Try adjusting your search filters.";
const SEARCH_FAILED: &str = "Failed to fetch businesses";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchOutcome {
    /// Nothing searched yet.
    #[default]
    Idle,
    Results(Vec<Business>),
    /// The backend answered with an empty list.
    Empty,
    Failed(String),
}

impl SearchOutcome {
    pub fn results(&self) -> &[Business] {
        match self {
            Self::Results(results) => results,
            Self::Idle | Self::Empty | Self::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Idle | Self::Results(_) | Self::Empty => None,
        }
    }
}

pub struct BusinessSearch {
    businesses: Arc<dyn BusinessApi>,
    emails: Arc<dyn EmailApi>,
    toasts: ToastQueue,
    filters: SearchFilters,
    outcome: SearchOutcome,
    selection: Selection,
}

impl BusinessSearch {
    pub fn new(
        businesses: Arc<dyn BusinessApi>,
        emails: Arc<dyn EmailApi>,
        toasts: ToastQueue,
    ) -> Self {
        Self {
            businesses,
            emails,
            toasts,
            filters: SearchFilters::default(),
            outcome: SearchOutcome::Idle,
            selection: Selection::new(),
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    pub fn set_filters(&mut self, filters: SearchFilters) {
        self.filters = filters;
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn results(&self) -> &[Business] {
        self.outcome.results()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Run discovery with the current filters. Failures land in the outcome.
    pub async fn search(&mut self) -> &SearchOutcome {
        let payload = self.filters.to_payload();
        info!(filters = %payload, "searching businesses");

        self.outcome = match self.businesses.search(&payload).await {
            Ok(results) if results.is_empty() => SearchOutcome::Empty,
            Ok(results) => {
                info!(count = results.len(), "businesses found");
                SearchOutcome::Results(results)
            }
            Err(err) => {
                warn!(error = %err, "business search failed");
                SearchOutcome::Failed(err.user_message(SEARCH_FAILED))
            }
        };
        self.selection.retain_present(self.outcome.results());

        &self.outcome
    }

    pub fn toggle(&mut self, id: BusinessId) -> bool {
        self.selection.toggle(id)
    }

    pub fn toggle_all(&mut self) {
        let Self { outcome, selection, .. } = self;
        selection.toggle_all(outcome.results());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Turn the selected businesses into a draft campaign.
    pub async fn create_campaign(
        &mut self,
        name: Option<&str>,
    ) -> Result<CampaignCreated, ActionError> {
        let businesses = self
            .selection
            .pick(self.outcome.results())
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if businesses.is_empty() {
            let err = ActionError::NothingSelected;
            self.toasts.warning(err.user_message(""));
            return Err(err);
        }

        let request = CampaignFromBusinessesRequest {
            businesses,
            name: name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        };

        match self.emails.campaign_from_businesses(&request).await {
            Ok(created) => {
                info!(
                    campaign_id = created.campaign_id,
                    recipients = created.recipients_count,
                    "campaign created from selection"
                );
                self.toasts.success(format!(
                    "Campaign created with {} recipient(s)",
                    created.recipients_count
                ));
                Ok(created)
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to create campaign"));
                Err(err.into())
            }
        }
    }

    /// Saved businesses, filtered server side by the non-empty fields.
    pub async fn list_directory(
        &self,
        filters: &SearchFilters,
    ) -> Result<Vec<Business>, ActionError> {
        let params = filters.to_params();
        self.businesses.list(&params).await.map_err(|err| {
            self.toasts.error(err.user_message("Failed to load businesses"));
            err.into()
        })
    }

    pub async fn add_business(&self, business: NewBusiness) -> Result<Business, ActionError> {
        if business.name.trim().is_empty() {
            return Err(DomainError::required("name").into());
        }

        match self.businesses.create(&business).await {
            Ok(created) => {
                info!(business_id = created.id, "business added");
                self.toasts.success("Business added successfully!");
                Ok(created)
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to add business"));
                Err(err.into())
            }
        }
    }
}
