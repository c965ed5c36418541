//! Worker container port
//!
//! The foreground side of the worker platform: registration, readiness,
//! message posting and periodic sync.

use std::time::Duration;

use async_trait::async_trait;
use domain::WorkerMessage;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Handle to a registered worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerRegistration {
    /// Scope the worker was registered for
    pub scope: String,
    /// Whether an active (ready) worker exists for this registration
    pub active: bool,
    /// Whether the platform offers periodic background sync
    pub periodic_sync_supported: bool,
}

/// Port for the foreground view of the worker platform
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkerContainerPort: Send + Sync {
    /// Whether the platform supports background workers at all
    fn is_supported(&self) -> bool;

    /// Register (or re-register) the worker for a scope
    async fn register(&self, scope: &str) -> Result<WorkerRegistration, ApplicationError>;

    /// Wait until a worker is active and return its registration
    async fn ready(&self) -> Result<WorkerRegistration, ApplicationError>;

    /// Whether a worker currently controls this page
    fn has_controller(&self) -> bool;

    /// Post a message to the controlling worker
    async fn post_to_controller(&self, message: WorkerMessage) -> Result<(), ApplicationError>;

    /// Post a message to the active worker of the ready registration
    async fn post_to_active(&self, message: WorkerMessage) -> Result<(), ApplicationError>;

    /// Register a recurring periodic sync
    async fn register_periodic_sync(
        &self,
        tag: &str,
        min_interval: Duration,
    ) -> Result<(), ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WorkerContainerPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WorkerContainerPort>();
    }
}
