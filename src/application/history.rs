use std::sync::Arc;

use devlink_api_types::HistoryPage;
use tracing::{debug, warn};

use crate::application::backend::EmailApi;
use crate::application::error::ActionError;
use crate::domain::error::DomainError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Paginated log of sent emails, newest first.
pub struct EmailHistory {
    api: Arc<dyn EmailApi>,
    page: u32,
    page_size: u32,
    current: Option<HistoryPage>,
    error: Option<String>,
}

impl EmailHistory {
    pub fn new(api: Arc<dyn EmailApi>) -> Self {
        Self {
            api,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            current: None,
            error: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current(&self) -> Option<&HistoryPage> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total_pages(&self) -> u64 {
        self.current.as_ref().map_or(0, HistoryPage::total_pages)
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), DomainError> {
        if page_size == 0 {
            return Err(DomainError::validation("Page size must be at least 1"));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    pub async fn load(&mut self, page: u32) -> Result<&HistoryPage, ActionError> {
        let page = page.max(1);
        self.error = None;

        match self.api.history(page, self.page_size).await {
            Ok(result) => {
                debug!(page, total = result.total, "email history loaded");
                self.page = page;
                Ok(self.current.insert(result))
            }
            Err(err) => {
                warn!(error = %err, page, "failed to load email history");
                self.error = Some(err.user_message("Failed to load email history"));
                Err(err.into())
            }
        }
    }

    pub async fn reload(&mut self) -> Result<&HistoryPage, ActionError> {
        self.load(self.page).await
    }

    /// Move forward when a next page exists; otherwise stay put.
    pub async fn next(&mut self) -> Result<&HistoryPage, ActionError> {
        let has_next = self.current.as_ref().is_some_and(HistoryPage::has_next);
        let target = if has_next { self.page + 1 } else { self.page };
        self.load(target).await
    }

    pub async fn previous(&mut self) -> Result<&HistoryPage, ActionError> {
        self.load(self.page.saturating_sub(1)).await
    }
}
