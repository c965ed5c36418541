//! Weather service port
//!
//! Defines the interface for forecast retrieval used by the worker.

use async_trait::async_trait;
use domain::{Coordinates, WeatherSnapshot};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch current conditions plus the hourly series for a location
    ///
    /// One outbound request per call; no retry, no caching.
    async fn fetch_weather(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherSnapshot, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WeatherPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WeatherPort>();
    }
}
