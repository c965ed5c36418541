//! Notification surface port

use async_trait::async_trait;
use domain::NotificationRequest;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the platform notification surface
///
/// Implementations coalesce by tag: showing a notification replaces any
/// visible one with the same tag.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Display a notification
    async fn show(&self, request: NotificationRequest) -> Result<(), ApplicationError>;

    /// Dismiss the notification with the given tag, returning whether one was visible
    async fn close(&self, tag: &str) -> Result<bool, ApplicationError>;

    /// Currently visible notifications
    async fn visible(&self) -> Result<Vec<NotificationRequest>, ApplicationError>;
}
