//! Notification requests handed to the platform notification surface

use serde::{Deserialize, Serialize};

use super::Alert;

/// Coalescing tag shared by every weather notification
pub const WEATHER_NOTIFICATION_TAG: &str = "weather-update";

/// Vibration pattern in milliseconds (vibrate, pause, vibrate)
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];

/// Title used when a push event carries no usable content
pub const DEFAULT_PUSH_TITLE: &str = "Rift Sky Weather";

/// Body used when a push event carries no usable content
pub const DEFAULT_PUSH_BODY: &str = "Weather update available";

/// Default icon and badge asset path
pub const DEFAULT_ICON_PATH: &str = "/vite.svg";

/// Everything the notification surface needs to display one notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Title line
    pub title: String,
    /// Body text
    pub body: String,
    /// Icon asset path
    pub icon: String,
    /// Badge asset path
    pub badge: String,
    /// Vibration pattern in milliseconds
    pub vibrate: Vec<u32>,
    /// Coalescing tag; a new notification replaces one with the same tag
    pub tag: String,
    /// Whether the notification stays until the user acts on it
    pub require_interaction: bool,
}

impl NotificationRequest {
    /// Build a weather-update notification from an alert
    #[must_use]
    pub fn from_alert(alert: Alert, icon: impl Into<String>) -> Self {
        Self::weather_update(alert.title, alert.body, icon)
    }

    /// Build a weather-update notification from raw title/body text
    #[must_use]
    pub fn weather_update(
        title: impl Into<String>,
        body: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        let icon = icon.into();
        Self {
            title: title.into(),
            body: body.into(),
            badge: icon.clone(),
            icon,
            vibrate: VIBRATION_PATTERN.to_vec(),
            tag: WEATHER_NOTIFICATION_TAG.to_string(),
            require_interaction: false,
        }
    }

    /// Override the badge asset
    #[must_use]
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }
}
