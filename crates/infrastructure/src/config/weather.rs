//! Weather provider configuration.

use domain::Coordinates;
use serde::{Deserialize, Serialize};

/// Open-Meteo provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,

    /// Position reported by the host geolocation source
    #[serde(default)]
    pub default_location: Option<GeoLocationConfig>,
}

/// Geographic location configuration (latitude/longitude pair)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl GeoLocationConfig {
    /// Convert to domain `Coordinates`
    ///
    /// Returns `None` if the coordinates are out of range.
    #[must_use]
    pub fn to_coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude, self.longitude).ok()
    }
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_weather_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_secs: default_weather_timeout(),
            default_location: None,
        }
    }
}

impl WeatherConfig {
    /// Client settings for the Open-Meteo integration
    #[must_use]
    pub fn to_client_config(&self) -> integration_weather::WeatherConfig {
        integration_weather::WeatherConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.default_location.is_none());
    }

    #[test]
    fn client_config_copies_fields() {
        let config = WeatherConfig {
            base_url: "http://localhost:9999".to_string(),
            timeout_secs: 5,
            default_location: None,
        };
        let client = config.to_client_config();
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.timeout_secs, 5);
    }

    #[test]
    fn location_converts_when_valid() {
        let location = GeoLocationConfig {
            latitude: 52.52,
            longitude: 13.405,
        };
        let coords = location.to_coordinates().unwrap();
        assert!((coords.latitude() - 52.52).abs() < f64::EPSILON);
    }

    #[test]
    fn location_out_of_range_is_none() {
        let location = GeoLocationConfig {
            latitude: 95.0,
            longitude: 0.0,
        };
        assert!(location.to_coordinates().is_none());
    }
}
