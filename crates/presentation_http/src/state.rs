//! Application state shared across handlers

use std::{fmt, sync::Arc};

use application::{ClientsPort, ForegroundBridge, ManualTrigger, NotificationPort};
use infrastructure::{AppConfig, WorkerHost};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Worker host receiving platform events
    pub host: Arc<WorkerHost>,
    /// Foreground bridge relaying location updates
    pub bridge: Arc<ForegroundBridge>,
    /// Manual trigger entry point
    pub manual_trigger: ManualTrigger,
    /// Notification surface the worker draws on
    pub notifications: Arc<dyn NotificationPort>,
    /// Foreground pages known to the host
    pub clients: Arc<dyn ClientsPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state and expose the bridge's manual trigger
    #[must_use]
    pub fn new(
        host: Arc<WorkerHost>,
        bridge: Arc<ForegroundBridge>,
        notifications: Arc<dyn NotificationPort>,
        clients: Arc<dyn ClientsPort>,
        config: AppConfig,
    ) -> Self {
        let manual_trigger = bridge.expose_manual_trigger();
        Self {
            host,
            bridge,
            manual_trigger,
            notifications,
            clients,
            config: Arc::new(config),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("host", &self.host)
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
