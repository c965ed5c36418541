//! Weather data models
//!
//! Public types returned by the client plus the raw Open-Meteo response
//! shape used for deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// Wind speed in km/h
    pub wind_speed: Option<f64>,
}

/// One hourly forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Start of the hour (UTC)
    pub time: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Precipitation probability in percent
    pub precipitation_probability: Option<u8>,
    /// Relative humidity in percent
    pub relative_humidity: Option<f64>,
    /// Apparent temperature in Celsius
    pub apparent_temperature: Option<f64>,
    /// Visibility in meters
    pub visibility: Option<f64>,
}

/// One daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast date (location-local)
    pub date: Option<NaiveDate>,
    /// Maximum UV index
    pub uv_index_max: Option<f64>,
    /// Sunrise (UTC)
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset (UTC)
    pub sunset: Option<DateTime<Utc>>,
}

/// Complete forecast for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Latitude of the grid cell used
    pub latitude: f64,
    /// Longitude of the grid cell used
    pub longitude: f64,
    /// Timezone resolved by the provider
    pub timezone: Option<String>,
    /// Offset of the resolved timezone from UTC
    pub utc_offset_seconds: i32,
    /// Current conditions
    pub current: CurrentConditions,
    /// Hourly series, ascending by time
    pub hourly: Vec<HourlyForecast>,
    /// Daily series
    pub daily: Vec<DailyForecast>,
}

// ============================================================================
// Raw API response
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub timezone: Option<String>,
    pub current_weather: Option<CurrentWeatherData>,
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherData {
    pub temperature: f64,
    pub weathercode: i32,
    pub windspeed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HourlyData {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    pub visibility: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}

impl DailyData {
    /// Number of days described by any of the series
    pub fn len(&self) -> usize {
        self.time
            .len()
            .max(self.uv_index_max.len())
            .max(self.sunrise.len())
            .max(self.sunset.len())
    }
}
