//! Foreground bridge
//!
//! The main-application side of the worker: registration, coordinate relay,
//! periodic sync setup and the manual trigger entry point used by external
//! hosts (native shells, OS schedulers) that cannot post to the worker
//! themselves.

use std::{fmt, sync::Arc, time::Duration};

use domain::{Coordinates, WEATHER_SYNC_TAG, WorkerMessage};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{GeolocationPort, WorkerContainerPort, WorkerRegistration};

/// Minimum interval requested for the weather periodic sync
pub const WEATHER_SYNC_MIN_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Delay between relaying coordinates and requesting a manual update
pub const DEFAULT_MANUAL_TRIGGER_DELAY: Duration = Duration::from_millis(100);

/// Configuration for the foreground bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Scope the worker is registered for
    pub scope: String,
    /// Wait after sending coordinates before a manual update
    pub manual_trigger_delay: Duration,
    /// Whether to request periodic sync after registration
    pub periodic_sync_enabled: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            scope: "/".to_string(),
            manual_trigger_delay: DEFAULT_MANUAL_TRIGGER_DELAY,
            periodic_sync_enabled: true,
        }
    }
}

/// Foreground side of the worker platform
pub struct ForegroundBridge {
    container: Arc<dyn WorkerContainerPort>,
    geolocation: Arc<dyn GeolocationPort>,
    config: BridgeConfig,
}

impl fmt::Debug for ForegroundBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForegroundBridge")
            .field("config", &self.config)
            .field("has_controller", &self.container.has_controller())
            .finish_non_exhaustive()
    }
}

impl ForegroundBridge {
    /// Create a new bridge
    #[must_use]
    pub fn new(
        container: Arc<dyn WorkerContainerPort>,
        geolocation: Arc<dyn GeolocationPort>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            container,
            geolocation,
            config,
        }
    }

    /// Register the worker and wait until it is ready
    ///
    /// Returns `None` when the platform has no worker support or
    /// registration fails; both cases are logged, never raised.
    #[instrument(skip(self), fields(scope = %self.config.scope))]
    pub async fn register_worker(&self) -> Option<WorkerRegistration> {
        if !self.container.is_supported() {
            warn!("Background workers are not supported on this platform");
            return None;
        }

        if let Err(e) = self.container.register(&self.config.scope).await {
            error!(error = %e, "Worker registration failed");
            return None;
        }

        match self.container.ready().await {
            Ok(registration) => {
                info!(scope = %registration.scope, "Worker registered");
                Some(registration)
            },
            Err(e) => {
                error!(error = %e, "Worker never became ready");
                None
            },
        }
    }

    /// Relay coordinates to the controlling worker
    ///
    /// Returns whether the message was posted. Without a controller this is
    /// a logged no-op.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    pub async fn send_coordinates(&self, coordinates: Coordinates) -> bool {
        if !self.container.has_controller() {
            warn!("No active worker controller; coordinates not sent");
            return false;
        }

        match self
            .container
            .post_to_controller(WorkerMessage::set_coordinates(coordinates))
            .await
        {
            Ok(()) => {
                debug!("Coordinates sent to worker");
                true
            },
            Err(e) => {
                error!(error = %e, "Failed to post coordinates");
                false
            },
        }
    }

    /// Request the recurring weather sync
    ///
    /// Returns `false` when the platform lacks periodic sync or the request
    /// is refused.
    #[instrument(skip(self, registration))]
    pub async fn register_periodic_sync(&self, registration: &WorkerRegistration) -> bool {
        if !registration.periodic_sync_supported {
            warn!("Periodic background sync is not supported on this platform");
            return false;
        }

        match self
            .container
            .register_periodic_sync(WEATHER_SYNC_TAG, WEATHER_SYNC_MIN_INTERVAL)
            .await
        {
            Ok(()) => {
                info!(
                    tag = WEATHER_SYNC_TAG,
                    interval_secs = WEATHER_SYNC_MIN_INTERVAL.as_secs(),
                    "Periodic sync registered"
                );
                true
            },
            Err(e) => {
                error!(error = %e, "Periodic sync registration failed");
                false
            },
        }
    }

    /// Send coordinates, wait briefly, then ask the worker for an update
    ///
    /// Stands in for server-initiated push where none is available.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    pub async fn trigger_manual_update(
        &self,
        coordinates: Coordinates,
    ) -> Result<(), ApplicationError> {
        if !self.container.is_supported() || !self.container.has_controller() {
            warn!("Worker not available for manual trigger");
            return Err(ApplicationError::NotReady(
                "no worker controls this page".to_string(),
            ));
        }

        self.send_coordinates(coordinates).await;
        tokio::time::sleep(self.config.manual_trigger_delay).await;

        let registration = self.container.ready().await?;
        if registration.active {
            self.container
                .post_to_active(WorkerMessage::manual_update(Some(coordinates)))
                .await?;
        }

        info!("Manual weather update triggered");
        Ok(())
    }

    /// Startup sequence of the foreground app
    ///
    /// Registers the worker, requests periodic sync when enabled and relays
    /// the current position if one can be resolved.
    pub async fn start(&self) -> Option<WorkerRegistration> {
        let registration = self.register_worker().await?;

        if self.config.periodic_sync_enabled {
            self.register_periodic_sync(&registration).await;
        }

        match self.geolocation.current_position().await {
            Ok(coordinates) => {
                self.send_coordinates(coordinates).await;
            },
            Err(e) => warn!(error = %e, "Position unavailable at startup"),
        }

        Some(registration)
    }

    /// Install the manual trigger entry point for external callers
    #[must_use]
    pub fn expose_manual_trigger(self: &Arc<Self>) -> ManualTrigger {
        info!("Manual weather trigger available");
        ManualTrigger {
            bridge: Arc::clone(self),
        }
    }
}

/// Entry point reachable by external hosts
///
/// Cheap to clone; every clone drives the same bridge.
#[derive(Debug, Clone)]
pub struct ManualTrigger {
    bridge: Arc<ForegroundBridge>,
}

impl ManualTrigger {
    /// Run a manual update, resolving the position first when none is given
    #[instrument(skip(self))]
    pub async fn invoke(&self, coordinates: Option<Coordinates>) -> Result<(), ApplicationError> {
        let coordinates = match coordinates {
            Some(coordinates) => coordinates,
            None => self
                .bridge
                .geolocation
                .current_position()
                .await
                .inspect_err(|e| error!(error = %e, "Failed to get current location"))?,
        };

        self.bridge.trigger_manual_update(coordinates).await
    }
}
