use std::sync::Arc;

use devlink_api_types::AnalyticsReport;
use tracing::{info, warn};

use crate::application::backend::EmailApi;
use crate::application::error::ActionError;
use crate::application::toasts::ToastQueue;
use crate::domain::error::DomainError;

pub const DEFAULT_ANALYTICS_DAYS: u32 = 30;
/// Windows offered by the dashboard selector.
pub const ANALYTICS_WINDOWS: [u32; 3] = [7, 30, 90];

pub struct AnalyticsDashboard {
    api: Arc<dyn EmailApi>,
    toasts: ToastQueue,
    days: u32,
    report: Option<AnalyticsReport>,
}

impl AnalyticsDashboard {
    pub fn new(api: Arc<dyn EmailApi>, toasts: ToastQueue) -> Self {
        Self {
            api,
            toasts,
            days: DEFAULT_ANALYTICS_DAYS,
            report: None,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn report(&self) -> Option<&AnalyticsReport> {
        self.report.as_ref()
    }

    /// Change the window. The next `load` uses it.
    pub fn set_days(&mut self, days: u32) -> Result<(), DomainError> {
        if days == 0 {
            return Err(DomainError::validation("Days must be a positive number"));
        }
        self.days = days;
        Ok(())
    }

    pub async fn load(&mut self) -> Result<&AnalyticsReport, ActionError> {
        match self.api.analytics(self.days).await {
            Ok(report) => {
                info!(
                    days = self.days,
                    total_emails = report.summary.total_emails,
                    "analytics loaded"
                );
                Ok(self.report.insert(report))
            }
            Err(err) => {
                warn!(error = %err, days = self.days, "failed to load analytics");
                self.toasts.error(err.user_message("Failed to load analytics"));
                Err(err.into())
            }
        }
    }

    /// Ask the backend to recompute today's figures, then reload.
    pub async fn refresh(&mut self) -> Result<&AnalyticsReport, ActionError> {
        match self.api.refresh_analytics().await {
            Ok(ack) => {
                info!(detail = ack.text().unwrap_or(""), "analytics recomputed");
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to update analytics"));
                return Err(err.into());
            }
        }
        self.load().await
    }
}
