//! Worker and notification configuration.

use std::time::Duration;

use application::{DEFAULT_CACHE_VERSION, DEFAULT_MANUAL_TRIGGER_DELAY};
use domain::{DEFAULT_ICON_PATH, DEFAULT_PUSH_BODY, DEFAULT_PUSH_TITLE};
use serde::{Deserialize, Serialize};

use super::default_true;

/// Notification presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAppConfig {
    /// Icon asset path
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Badge asset path
    #[serde(default = "default_icon")]
    pub badge: String,

    /// Title for push events without usable content
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Body for push events without usable content
    #[serde(default = "default_body")]
    pub default_body: String,
}

fn default_icon() -> String {
    DEFAULT_ICON_PATH.to_string()
}

fn default_title() -> String {
    DEFAULT_PUSH_TITLE.to_string()
}

fn default_body() -> String {
    DEFAULT_PUSH_BODY.to_string()
}

impl Default for NotificationAppConfig {
    fn default() -> Self {
        Self {
            icon: default_icon(),
            badge: default_icon(),
            default_title: default_title(),
            default_body: default_body(),
        }
    }
}

/// Worker host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAppConfig {
    /// Cache namespace kept on activation
    #[serde(default = "default_cache_version")]
    pub cache_version: String,

    /// Registration scope, also the root page opened on notification click
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Whether the foreground bridge requests periodic sync
    #[serde(default = "default_true")]
    pub periodic_sync_enabled: bool,

    /// Delay between coordinate relay and manual update, in milliseconds
    #[serde(default = "default_manual_trigger_delay_ms")]
    pub manual_trigger_delay_ms: u64,

    /// Capacity of the worker event channel
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Cache namespaces present when the host starts
    #[serde(default)]
    pub known_caches: Vec<String>,
}

fn default_cache_version() -> String {
    DEFAULT_CACHE_VERSION.to_string()
}

fn default_scope() -> String {
    "/".to_string()
}

#[allow(clippy::cast_possible_truncation)]
const fn default_manual_trigger_delay_ms() -> u64 {
    DEFAULT_MANUAL_TRIGGER_DELAY.as_millis() as u64
}

const fn default_event_buffer_size() -> usize {
    64
}

impl Default for WorkerAppConfig {
    fn default() -> Self {
        Self {
            cache_version: default_cache_version(),
            scope: default_scope(),
            periodic_sync_enabled: true,
            manual_trigger_delay_ms: default_manual_trigger_delay_ms(),
            event_buffer_size: default_event_buffer_size(),
            known_caches: Vec::new(),
        }
    }
}

impl WorkerAppConfig {
    /// Manual trigger delay as a `Duration`
    #[must_use]
    pub const fn manual_trigger_delay(&self) -> Duration {
        Duration::from_millis(self.manual_trigger_delay_ms)
    }
}
