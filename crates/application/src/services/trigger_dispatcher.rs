//! Trigger dispatcher - The worker's event handling surface
//!
//! Runs the lifecycle (install, activate with cache cleanup and claim) and,
//! once ready, routes every [`Trigger`] to the weather pipeline or the
//! window clients. No handler error escapes `dispatch`; failures are logged
//! and only cost the one notification they belonged to.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use domain::{
    Alert, Coordinates, DEFAULT_ICON_PATH, DEFAULT_PUSH_BODY, DEFAULT_PUSH_TITLE,
    NotificationRequest, PushPayload, Trigger, WEATHER_SYNC_TAG,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{CacheStoragePort, ClientsPort, NotificationPort, WeatherPort};
use crate::services::alert_deriver::derive_alert;
use crate::services::coordinate_store::CoordinateStore;

/// Default cache namespace version kept across activations
pub const DEFAULT_CACHE_VERSION: &str = "rift-sky-v1";

/// Lifecycle state of a worker instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    /// Installed, waiting for activation
    Installing,
    /// Cleaning caches and claiming pages
    Activating,
    /// Handling triggers
    Ready,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installing => write!(f, "installing"),
            Self::Activating => write!(f, "activating"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

/// Configuration for the trigger dispatcher
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Cache namespace to keep on activation; every other one is deleted
    pub cache_version: String,
    /// Root path of the foreground app
    pub root_url: String,
    /// Notification icon asset
    pub icon: String,
    /// Notification badge asset
    pub badge: String,
    /// Title shown for a push without usable content
    pub default_title: String,
    /// Body shown for a push without usable content
    pub default_body: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            root_url: "/".to_string(),
            icon: DEFAULT_ICON_PATH.to_string(),
            badge: DEFAULT_ICON_PATH.to_string(),
            default_title: DEFAULT_PUSH_TITLE.to_string(),
            default_body: DEFAULT_PUSH_BODY.to_string(),
        }
    }
}

/// Routes worker triggers to the weather pipeline
pub struct TriggerDispatcher {
    store: Arc<CoordinateStore>,
    weather: Arc<dyn WeatherPort>,
    notifications: Arc<dyn NotificationPort>,
    clients: Arc<dyn ClientsPort>,
    caches: Arc<dyn CacheStoragePort>,
    config: DispatcherConfig,
    state: RwLock<WorkerState>,
    clock: fn() -> DateTime<Utc>,
}

impl fmt::Debug for TriggerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerDispatcher")
            .field("state", &*self.state.read())
            .field("coordinates", &self.store.get())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TriggerDispatcher {
    /// Create a dispatcher in the `Installing` state
    #[must_use]
    pub fn new(
        store: Arc<CoordinateStore>,
        weather: Arc<dyn WeatherPort>,
        notifications: Arc<dyn NotificationPort>,
        clients: Arc<dyn ClientsPort>,
        caches: Arc<dyn CacheStoragePort>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            store,
            weather,
            notifications,
            clients,
            caches,
            config,
            state: RwLock::new(WorkerState::Installing),
            clock: Utc::now,
        }
    }

    /// Replace the time source used for alert derivation
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    /// The coordinate store this dispatcher reads from
    #[must_use]
    pub fn store(&self) -> &Arc<CoordinateStore> {
        &self.store
    }

    /// Handle the install event
    ///
    /// The worker skips waiting, so activation follows immediately.
    pub fn install(&self) {
        *self.state.write() = WorkerState::Installing;
        info!("Worker installing");
    }

    /// Handle the activate event
    ///
    /// Deletes every cache namespace other than the configured version, then
    /// claims open pages. Returns the number of deleted namespaces.
    #[instrument(skip(self), fields(cache_version = %self.config.cache_version))]
    pub async fn activate(&self) -> usize {
        *self.state.write() = WorkerState::Activating;

        let deleted = match self.evict_stale_caches().await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!(error = %e, "Cache cleanup failed");
                0
            },
        };

        if let Err(e) = self.clients.claim().await {
            warn!(error = %e, "Failed to claim open pages");
        }

        *self.state.write() = WorkerState::Ready;
        info!(deleted, "Worker activated");
        deleted
    }

    async fn evict_stale_caches(&self) -> Result<usize, ApplicationError> {
        let mut deleted = 0;
        for name in self.caches.keys().await? {
            if name == self.config.cache_version {
                continue;
            }
            if self.caches.delete(&name).await? {
                info!(cache = %name, "Deleted stale cache");
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Handle one trigger
    ///
    /// Triggers arriving before activation completes are logged and dropped.
    #[instrument(skip(self, trigger), fields(kind = trigger.kind()))]
    pub async fn dispatch(&self, trigger: Trigger) {
        let state = self.state();
        if state != WorkerState::Ready {
            warn!(%state, "Dropping trigger before activation");
            return;
        }

        match trigger {
            Trigger::SetCoordinates(coordinates) => self.store.set(coordinates),
            Trigger::ManualUpdate { coordinates } => self.handle_manual_update(coordinates).await,
            Trigger::Push(payload) => self.handle_push(&payload).await,
            Trigger::PeriodicSync { tag } => self.handle_periodic_sync(&tag).await,
            Trigger::NotificationClick { tag } => self.handle_notification_click(&tag).await,
        }
    }

    async fn handle_manual_update(&self, requested: Option<Coordinates>) {
        let Some(coordinates) = requested.or_else(|| self.store.get()) else {
            debug!("Manual update without coordinates, skipping");
            return;
        };

        if let Err(e) = self.show_weather(&coordinates).await {
            error!(error = %e, %coordinates, "Manual weather update failed");
        }
    }

    async fn handle_push(&self, payload: &PushPayload) {
        let explicit = match payload.content() {
            Ok(Some(content)) if content.is_explicit() => Some(content),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed push payload");
                None
            },
        };

        let (title, body) = if let Some(content) = explicit {
            debug!("Showing push content verbatim");
            (
                content.title().unwrap_or(self.config.default_title.as_str()).to_string(),
                content.body().unwrap_or(self.config.default_body.as_str()).to_string(),
            )
        } else if let Some(coordinates) = self.store.get() {
            match self.fetch_alert(&coordinates).await {
                Ok(alert) => (alert.title, alert.body),
                Err(e) => {
                    error!(error = %e, %coordinates, "Push weather fetch failed, using defaults");
                    self.default_content()
                },
            }
        } else {
            debug!("Push without content or coordinates, using defaults");
            self.default_content()
        };

        if let Err(e) = self.notifications.show(self.notification(title, body)).await {
            error!(error = %e, "Failed to show push notification");
        }
    }

    async fn handle_periodic_sync(&self, tag: &str) {
        if tag != WEATHER_SYNC_TAG {
            debug!(tag, "Ignoring unrelated periodic sync");
            return;
        }
        let Some(coordinates) = self.store.get() else {
            debug!("Periodic sync without stored coordinates, skipping");
            return;
        };

        if let Err(e) = self.show_weather(&coordinates).await {
            error!(error = %e, %coordinates, "Periodic weather sync failed");
        }
    }

    async fn handle_notification_click(&self, tag: &str) {
        if let Err(e) = self.notifications.close(tag).await {
            warn!(error = %e, tag, "Failed to dismiss notification");
        }

        let windows = match self.clients.match_windows().await {
            Ok(windows) => windows,
            Err(e) => {
                error!(error = %e, "Failed to list window clients");
                return;
            },
        };

        let result = match windows
            .iter()
            .find(|client| client.path() == self.config.root_url)
        {
            Some(client) => self.clients.focus(&client.id).await,
            None => self.clients.open_window(&self.config.root_url).await,
        };

        match result {
            Ok(client) => debug!(client = %client.id, "Foreground page focused"),
            Err(e) => error!(error = %e, "Failed to focus or open foreground page"),
        }
    }

    async fn show_weather(&self, coordinates: &Coordinates) -> Result<(), ApplicationError> {
        let alert = self.fetch_alert(coordinates).await?;
        self.notifications
            .show(self.notification(alert.title, alert.body))
            .await
    }

    async fn fetch_alert(&self, coordinates: &Coordinates) -> Result<Alert, ApplicationError> {
        let snapshot = self.weather.fetch_weather(coordinates).await?;
        Ok(derive_alert(&snapshot, (self.clock)()))
    }

    fn default_content(&self) -> (String, String) {
        (
            self.config.default_title.clone(),
            self.config.default_body.clone(),
        )
    }

    fn notification(&self, title: String, body: String) -> NotificationRequest {
        NotificationRequest::weather_update(title, body, self.config.icon.clone())
            .with_badge(self.config.badge.clone())
    }
}
