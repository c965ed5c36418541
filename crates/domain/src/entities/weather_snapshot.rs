//! Normalized forecast snapshot
//!
//! Created per fetch and discarded right after alert derivation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::WeatherCode;

/// One hourly forecast sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Start of the forecast hour (UTC)
    pub time: DateTime<Utc>,
    /// Precipitation probability in percent (0-100)
    pub precipitation_probability: u8,
}

impl HourlySample {
    /// Create a sample
    #[must_use]
    pub const fn new(time: DateTime<Utc>, precipitation_probability: u8) -> Self {
        Self {
            time,
            precipitation_probability,
        }
    }
}

/// Daily fields only consumed by UI surfaces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Forecast date
    pub date: Option<NaiveDate>,
    /// Maximum UV index
    pub uv_index_max: Option<f64>,
    /// Sunrise (UTC)
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset (UTC)
    pub sunset: Option<DateTime<Utc>>,
}

/// Normalized response of a forecast query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Current temperature in Celsius
    pub temperature: f64,
    /// Current WMO condition code
    pub weather_code: WeatherCode,
    /// Current wind speed in km/h
    pub wind_speed: Option<f64>,
    /// Hourly samples, ascending by time as delivered by the provider
    pub hourly: Vec<HourlySample>,
    /// Daily summaries
    #[serde(default)]
    pub daily: Vec<DailySummary>,
}

impl WeatherSnapshot {
    /// Create a snapshot with current conditions only
    #[must_use]
    pub const fn new(temperature: f64, weather_code: WeatherCode) -> Self {
        Self {
            temperature,
            weather_code,
            wind_speed: None,
            hourly: Vec::new(),
            daily: Vec::new(),
        }
    }

    /// Attach the hourly series
    #[must_use]
    pub fn with_hourly(mut self, hourly: Vec<HourlySample>) -> Self {
        self.hourly = hourly;
        self
    }

    /// Attach daily summaries
    #[must_use]
    pub fn with_daily(mut self, daily: Vec<DailySummary>) -> Self {
        self.daily = daily;
        self
    }

    /// Attach the current wind speed
    #[must_use]
    pub const fn with_wind_speed(mut self, wind_speed: f64) -> Self {
        self.wind_speed = Some(wind_speed);
        self
    }
}
