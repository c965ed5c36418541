//! Geolocation port

use async_trait::async_trait;
use domain::Coordinates;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for resolving the device position
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Current position of the device
    ///
    /// Returns `UnsupportedPlatform` when no position source exists.
    async fn current_position(&self) -> Result<Coordinates, ApplicationError>;
}
