//! Profile screen: account details, avatar upload, password change and usage stats.

use std::sync::Arc;

use devlink_api_types::{ProfileUpdateRequest, UserProfile, UserStats};
use tracing::{info, warn};

use crate::application::backend::{AuthApi, ImageUpload};
use crate::application::error::ActionError;
use crate::application::toasts::ToastQueue;
use crate::domain::compose::build_password_change;
use crate::domain::error::DomainError;

pub struct ProfileManager {
    api: Arc<dyn AuthApi>,
    toasts: ToastQueue,
    profile: Option<UserProfile>,
    stats: Option<UserStats>,
    error: Option<String>,
}

impl ProfileManager {
    pub fn new(api: Arc<dyn AuthApi>, toasts: ToastQueue) -> Self {
        Self {
            api,
            toasts,
            profile: None,
            stats: None,
            error: None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn stats(&self) -> Option<&UserStats> {
        self.stats.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self) -> Result<&UserProfile, ActionError> {
        self.error = None;
        match self.api.profile().await {
            Ok(profile) => Ok(self.profile.insert(profile)),
            Err(err) => {
                warn!(error = %err, "failed to load profile");
                self.error = Some(err.user_message("Failed to load profile"));
                Err(err.into())
            }
        }
    }

    /// Save changed fields; an image switches the request to multipart.
    pub async fn update(
        &mut self,
        update: ProfileUpdateRequest,
        image: Option<ImageUpload>,
    ) -> Result<&UserProfile, ActionError> {
        if update.is_empty() && image.is_none() {
            return Err(DomainError::validation("Nothing to update").into());
        }

        let with_image = image.is_some();
        match self.api.update_profile(&update, image).await {
            Ok(profile) => {
                info!(user_id = profile.id, with_image, "profile updated");
                self.toasts.success("Profile updated successfully!");
                Ok(self.profile.insert(profile))
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to update profile"));
                Err(err.into())
            }
        }
    }

    pub async fn change_password(
        &mut self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ActionError> {
        let request = match build_password_change(current, new, confirm) {
            Ok(request) => request,
            Err(err) => {
                self.toasts.error(err.user_message());
                return Err(err.into());
            }
        };

        match self.api.change_password(&request).await {
            Ok(_) => {
                info!("password changed");
                self.toasts.success("Password changed successfully!");
                Ok(())
            }
            Err(err) => {
                self.toasts.error(err.user_message("Failed to change password"));
                Err(err.into())
            }
        }
    }

    pub async fn load_stats(&mut self) -> Result<&UserStats, ActionError> {
        match self.api.stats().await {
            Ok(stats) => Ok(self.stats.insert(stats)),
            Err(err) => {
                warn!(error = %err, "failed to load stats");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApiError;
    use crate::application::testing::FakeBackend;
    use serde_json::{Value, json};

    fn profile_json(first_name: &str) -> Value {
        json!({
            "id": 1,
            "username": "ada",
            "email": "ada@example.com",
            "first_name": first_name,
            "last_name": "Lovelace",
            "date_joined": "2025-01-01T00:00:00Z",
            "profile": {"work_image": "/media/work_images/ada.png"}
        })
    }

    #[tokio::test]
    async fn load_failure_is_inline() {
        let backend = Arc::new(FakeBackend::new());
        backend.fail("profile", ApiError::server(500, None));
        let toasts = ToastQueue::default();
        let mut manager = ProfileManager::new(backend, toasts.clone());

        assert!(manager.load().await.is_err());
        assert_eq!(manager.error(), Some("Failed to load profile"));
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn update_with_image_forwards_the_upload() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply("update_profile", profile_json("Augusta"));
        let toasts = ToastQueue::default();
        let mut manager = ProfileManager::new(backend.clone(), toasts.clone());

        let update = ProfileUpdateRequest {
            first_name: Some("Augusta".into()),
            ..Default::default()
        };
        let image = ImageUpload {
            file_name: "ada.png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        let profile = manager.update(update, Some(image)).await.expect("updated");

        assert_eq!(profile.display_name(), "Augusta Lovelace");
        assert_eq!(
            backend.requests("update_profile"),
            vec![json!({"first_name": "Augusta", "work_image": "ada.png"})]
        );
        assert_eq!(toasts.snapshot()[0].message, "Profile updated successfully!");
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let backend = Arc::new(FakeBackend::new());
        let mut manager = ProfileManager::new(backend.clone(), ToastQueue::default());

        assert!(manager.update(ProfileUpdateRequest::default(), None).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn password_rules_toast_before_any_request() {
        let backend = Arc::new(FakeBackend::new());
        let toasts = ToastQueue::default();
        let mut manager = ProfileManager::new(backend.clone(), toasts.clone());

        assert!(manager.change_password("old", "abc", "abc").await.is_err());
        assert!(manager.change_password("old", "abcdefgh", "abcdefgX").await.is_err());
        let texts = toasts.snapshot().into_iter().map(|t| t.message).collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec![
                "Password must be at least 8 characters long",
                "New passwords do not match"
            ]
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn password_change_reports_backend_detail() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply_once(
            "change_password",
            Err(ApiError::server(400, Some("Current password is incorrect".into()))),
        );
        backend.reply_once(
            "change_password",
            Ok(json!({"message": "Password changed successfully"})),
        );
        let toasts = ToastQueue::default();
        let mut manager = ProfileManager::new(backend, toasts.clone());

        assert!(manager.change_password("bad", "abcdefgh", "abcdefgh").await.is_err());
        manager
            .change_password("good", "abcdefgh", "abcdefgh")
            .await
            .expect("changed");
        let texts = toasts.snapshot().into_iter().map(|t| t.message).collect::<Vec<_>>();
        assert_eq!(
            texts,
            vec!["Current password is incorrect", "Password changed successfully!"]
        );
    }

    #[tokio::test]
    async fn stats_are_cached() {
        let backend = Arc::new(FakeBackend::new());
        backend.reply(
            "stats",
            json!({
                "total_emails": 4,
                "emails_this_month": 2,
                "emails_this_week": 1,
                "unique_recipients": 3,
                "last_email_date": null
            }),
        );
        let mut manager = ProfileManager::new(backend, ToastQueue::default());

        assert_eq!(manager.load_stats().await.expect("stats").total_emails, 4);
        assert_eq!(manager.stats().map(|s| s.unique_recipients), Some(3));
    }
}
