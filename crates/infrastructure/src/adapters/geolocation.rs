//! Host geolocation source
//!
//! The host has no positioning hardware; it reports a configured position,
//! which can be replaced at runtime.

use application::error::ApplicationError;
use application::ports::GeolocationPort;
use async_trait::async_trait;
use domain::Coordinates;
use parking_lot::RwLock;

/// Geolocation that reports a fixed, replaceable position
#[derive(Debug, Default)]
pub struct StaticGeolocation {
    position: RwLock<Option<Coordinates>>,
}

impl StaticGeolocation {
    /// Create a source, optionally with an initial position
    #[must_use]
    pub fn new(position: Option<Coordinates>) -> Self {
        Self {
            position: RwLock::new(position),
        }
    }

    /// Replace the reported position
    pub fn set_position(&self, position: Coordinates) {
        *self.position.write() = Some(position);
    }
}

#[async_trait]
impl GeolocationPort for StaticGeolocation {
    async fn current_position(&self) -> Result<Coordinates, ApplicationError> {
        (*self.position.read()).ok_or_else(|| {
            ApplicationError::UnsupportedPlatform("No position source configured".to_string())
        })
    }
}
