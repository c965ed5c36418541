//! In-process notification surface
//!
//! Holds the notifications currently on screen. Showing a notification
//! replaces a visible one with the same tag in place.

use std::sync::atomic::{AtomicU64, Ordering};

use application::error::ApplicationError;
use application::ports::NotificationPort;
use async_trait::async_trait;
use domain::NotificationRequest;
use parking_lot::RwLock;
use tracing::{debug, info};

/// Notification surface backed by memory
#[derive(Debug, Default)]
pub struct InMemoryNotificationCenter {
    visible: RwLock<Vec<NotificationRequest>>,
    shown: AtomicU64,
}

impl InMemoryNotificationCenter {
    /// Create an empty notification center
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total notifications shown since creation, including replaced ones
    #[must_use]
    pub fn shown_count(&self) -> u64 {
        self.shown.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationPort for InMemoryNotificationCenter {
    async fn show(&self, request: NotificationRequest) -> Result<(), ApplicationError> {
        info!(
            tag = %request.tag,
            title = %request.title,
            body = %request.body,
            "Notification shown"
        );

        {
            let mut visible = self.visible.write();
            match visible.iter_mut().find(|n| n.tag == request.tag) {
                Some(existing) => *existing = request,
                None => visible.push(request),
            }
        }
        self.shown.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn close(&self, tag: &str) -> Result<bool, ApplicationError> {
        let mut visible = self.visible.write();
        let before = visible.len();
        visible.retain(|n| n.tag != tag);
        let closed = visible.len() != before;
        debug!(tag, closed, "Notification close requested");
        Ok(closed)
    }

    async fn visible(&self) -> Result<Vec<NotificationRequest>, ApplicationError> {
        Ok(self.visible.read().clone())
    }
}
