//! Open-Meteo weather client
//!
//! HTTP client for the Open-Meteo forecast endpoint.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    ApiResponse, CurrentConditions, DailyData, DailyForecast, Forecast, HourlyData, HourlyForecast,
};

/// Hourly series requested from the provider
pub const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability";

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Weather client trait for fetching forecasts
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch current conditions and the hourly series for a location
    async fn get_forecast(&self, latitude: f64, longitude: f64)
    -> Result<Forecast, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(WeatherConfig::default())
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    fn query(latitude: f64, longitude: f64) -> [(&'static str, String); 5] {
        [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", "auto".to_string()),
        ]
    }

    fn parse_forecast(response: ApiResponse) -> Result<Forecast, WeatherError> {
        let offset = FixedOffset::east_opt(response.utc_offset_seconds).ok_or_else(|| {
            WeatherError::ParseError(format!(
                "Invalid UTC offset: {}",
                response.utc_offset_seconds
            ))
        })?;

        let current = response.current_weather.ok_or_else(|| {
            WeatherError::ParseError("No current weather data in response".to_string())
        })?;

        let hourly = response
            .hourly
            .map(|data| Self::parse_hourly(&data, offset))
            .transpose()?
            .unwrap_or_default();

        let daily = response
            .daily
            .map(|data| Self::parse_daily(&data, offset))
            .transpose()?
            .unwrap_or_default();

        Ok(Forecast {
            latitude: response.latitude,
            longitude: response.longitude,
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            current: CurrentConditions {
                temperature: current.temperature,
                weather_code: current.weathercode,
                wind_speed: current.windspeed,
            },
            hourly,
            daily,
        })
    }

    fn parse_hourly(
        data: &HourlyData,
        offset: FixedOffset,
    ) -> Result<Vec<HourlyForecast>, WeatherError> {
        data.time
            .iter()
            .enumerate()
            .map(|(i, time)| {
                Ok(HourlyForecast {
                    time: Self::parse_local_datetime(time, offset)?,
                    temperature: value_at(&data.temperature_2m, i),
                    precipitation_probability: value_at(&data.precipitation_probability, i)
                        .map(percent),
                    relative_humidity: value_at(&data.relative_humidity_2m, i),
                    apparent_temperature: value_at(&data.apparent_temperature, i),
                    visibility: value_at(&data.visibility, i),
                })
            })
            .collect()
    }

    fn parse_daily(
        data: &DailyData,
        offset: FixedOffset,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        (0..data.len())
            .map(|i| {
                let date = data
                    .time
                    .get(i)
                    .map(|d| {
                        NaiveDate::parse_from_str(d, "%Y-%m-%d")
                            .map_err(|e| WeatherError::ParseError(format!("Invalid date: {e}")))
                    })
                    .transpose()?;
                let sunrise = data
                    .sunrise
                    .get(i)
                    .and_then(Option::as_deref)
                    .map(|s| Self::parse_local_datetime(s, offset))
                    .transpose()?;
                let sunset = data
                    .sunset
                    .get(i)
                    .and_then(Option::as_deref)
                    .map(|s| Self::parse_local_datetime(s, offset))
                    .transpose()?;

                Ok(DailyForecast {
                    date,
                    uv_index_max: value_at(&data.uv_index_max, i),
                    sunrise,
                    sunset,
                })
            })
            .collect()
    }

    /// Parse a provider-local timestamp and convert it to UTC
    ///
    /// With `timezone=auto` the provider reports naive local times; the
    /// response's `utc_offset_seconds` anchors them.
    fn parse_local_datetime(s: &str, offset: FixedOffset) -> Result<DateTime<Utc>, WeatherError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| WeatherError::ParseError(format!("Invalid datetime format: {s}")))?;

        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| WeatherError::ParseError(format!("Ambiguous local time: {s}")))
    }
}

fn value_at<T: Copy>(series: &[Option<T>], index: usize) -> Option<T> {
    series.get(index).copied().flatten()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.forecast_url();
        debug!(url = %url, "Fetching weather forecast");

        let response = self
            .client
            .get(&url)
            .query(&Self::query(latitude, longitude))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    WeatherError::ConnectionFailed(e.to_string())
                } else {
                    WeatherError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let forecast = Self::parse_forecast(api_response)?;
        debug!(
            hourly = forecast.hourly.len(),
            daily = forecast.daily.len(),
            "Forecast received"
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(secs: i32) -> FixedOffset {
        FixedOffset::east_opt(secs).expect("valid offset")
    }

    #[test]
    fn test_config_defaults() {
        let config = WeatherConfig::default();
        assert_eq!(config.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(OpenMeteoClient::validate_coordinates(0.0, 0.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(90.0, 180.0).is_ok());
        assert!(OpenMeteoClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(OpenMeteoClient::validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn test_forecast_url_trims_trailing_slash() {
        let client = OpenMeteoClient::new(WeatherConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            timeout_secs: 5,
        })
        .expect("client creation should succeed");
        assert_eq!(client.forecast_url(), "http://localhost:8080/v1/forecast");
    }

    #[test]
    fn test_query_has_fixed_parameters() {
        let query = OpenMeteoClient::query(12.5, -3.25);
        assert!(query.contains(&("latitude", "12.5".to_string())));
        assert!(query.contains(&("longitude", "-3.25".to_string())));
        assert!(query.contains(&("hourly", HOURLY_FIELDS.to_string())));
        assert!(query.contains(&("current_weather", "true".to_string())));
        assert!(query.contains(&("timezone", "auto".to_string())));
    }

    #[test]
    fn test_local_time_converted_with_offset() {
        let dt = OpenMeteoClient::parse_local_datetime("2026-02-05T14:00", offset(3600))
            .expect("should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2026-02-05 13:00");
    }

    #[test]
    fn test_local_time_with_seconds() {
        let dt = OpenMeteoClient::parse_local_datetime("2026-02-05T14:00:00", offset(-18000))
            .expect("should parse");
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2026-02-05 19:00");
    }

    #[test]
    fn test_rfc3339_keeps_its_own_offset() {
        let dt = OpenMeteoClient::parse_local_datetime("2026-02-05T14:00:00+02:00", offset(0))
            .expect("should parse");
        assert_eq!(dt.format("%H:%M").to_string(), "12:00");
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(OpenMeteoClient::parse_local_datetime("invalid", offset(0)).is_err());
        assert!(OpenMeteoClient::parse_local_datetime("2026-02-05", offset(0)).is_err());
    }

    #[test]
    fn test_percent_clamps_and_rounds() {
        assert_eq!(percent(44.6), 45);
        assert_eq!(percent(-3.0), 0);
        assert_eq!(percent(140.0), 100);
    }

    #[test]
    fn test_parse_forecast_requires_current_weather() {
        let raw: ApiResponse = serde_json::from_value(serde_json::json!({
            "latitude": 0.0,
            "longitude": 0.0
        }))
        .expect("raw parse");
        assert!(matches!(
            OpenMeteoClient::parse_forecast(raw),
            Err(WeatherError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_forecast_aligns_series() {
        let raw: ApiResponse = serde_json::from_value(serde_json::json!({
            "latitude": 12.97,
            "longitude": 77.59,
            "utc_offset_seconds": 19800,
            "timezone": "Asia/Kolkata",
            "current_weather": {"temperature": 27.4, "weathercode": 2, "windspeed": 9.1},
            "hourly": {
                "time": ["2026-06-01T05:30", "2026-06-01T06:30", "2026-06-01T07:30"],
                "temperature_2m": [24.0, 25.1],
                "precipitation_probability": [10, null, 70]
            },
            "daily": {
                "time": ["2026-06-01"],
                "uv_index_max": [9.5],
                "sunrise": ["2026-06-01T05:53"],
                "sunset": ["2026-06-01T18:41"]
            }
        }))
        .expect("raw parse");

        let forecast = OpenMeteoClient::parse_forecast(raw).expect("forecast");

        assert_eq!(forecast.current.weather_code, 2);
        assert_eq!(forecast.current.wind_speed, Some(9.1));
        assert_eq!(forecast.hourly.len(), 3);
        assert_eq!(
            forecast.hourly[0].time.format("%H:%M").to_string(),
            "00:00"
        );
        assert_eq!(forecast.hourly[1].precipitation_probability, None);
        assert_eq!(forecast.hourly[2].precipitation_probability, Some(70));
        assert_eq!(forecast.hourly[2].temperature, None);
        assert_eq!(forecast.daily.len(), 1);
        assert_eq!(forecast.daily[0].uv_index_max, Some(9.5));
        assert_eq!(
            forecast.daily[0].sunrise.map(|t| t.format("%H:%M").to_string()),
            Some("00:23".to_string())
        );
    }

    #[test]
    fn test_weather_error_display() {
        let err = WeatherError::InvalidCoordinates;
        assert!(err.to_string().contains("latitude"));

        let err = WeatherError::RateLimitExceeded;
        assert!(err.to_string().contains("Rate limit"));
    }

    #[test]
    fn test_client_creation() {
        assert!(OpenMeteoClient::with_defaults().is_ok());
    }
}
