//! Weather adapter - Implements WeatherPort using integration_weather

use application::error::ApplicationError;
use application::ports::WeatherPort;
use async_trait::async_trait;
use domain::{Coordinates, DailySummary, DomainError, HourlySample, WeatherCode, WeatherSnapshot};
use integration_weather::{
    DailyForecast, Forecast, HourlyForecast, OpenMeteoClient, WeatherClient, WeatherConfig,
    WeatherError,
};
use tracing::{debug, instrument};

/// Adapter for the Open-Meteo forecast API
pub struct WeatherAdapter {
    client: OpenMeteoClient,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"OpenMeteoClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create a new adapter with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        let client = OpenMeteoClient::with_defaults()
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenMeteoClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError, coordinates: &Coordinates) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::Network(e),
            WeatherError::RateLimitExceeded => {
                ApplicationError::Network("rate limit exceeded".to_string())
            },
            WeatherError::ParseError(e) => ApplicationError::ExternalService(e),
            WeatherError::InvalidCoordinates => ApplicationError::Domain(
                DomainError::invalid_coordinates(coordinates.latitude(), coordinates.longitude()),
            ),
        }
    }

    /// Missing probabilities count as no rain
    fn map_hourly(hourly: &HourlyForecast) -> HourlySample {
        HourlySample::new(hourly.time, hourly.precipitation_probability.unwrap_or(0))
    }

    fn map_daily(daily: &DailyForecast) -> DailySummary {
        DailySummary {
            date: daily.date,
            uv_index_max: daily.uv_index_max,
            sunrise: daily.sunrise,
            sunset: daily.sunset,
        }
    }

    fn to_snapshot(forecast: &Forecast) -> WeatherSnapshot {
        let snapshot = WeatherSnapshot::new(
            forecast.current.temperature,
            WeatherCode::new(forecast.current.weather_code),
        )
        .with_hourly(forecast.hourly.iter().map(Self::map_hourly).collect())
        .with_daily(forecast.daily.iter().map(Self::map_daily).collect());

        match forecast.current.wind_speed {
            Some(speed) => snapshot.with_wind_speed(speed),
            None => snapshot,
        }
    }
}

#[async_trait]
impl WeatherPort for WeatherAdapter {
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn fetch_weather(
        &self,
        coordinates: &Coordinates,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let forecast = self
            .client
            .get_forecast(coordinates.latitude(), coordinates.longitude())
            .await
            .map_err(|e| {
                debug!(error = %e, "Failed to fetch forecast");
                Self::map_error(e, coordinates)
            })?;

        debug!(
            temperature = forecast.current.temperature,
            weather_code = forecast.current.weather_code,
            hours = forecast.hourly.len(),
            "Retrieved forecast"
        );

        Ok(Self::to_snapshot(&forecast))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use integration_weather::CurrentConditions;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::*;

    fn berlin() -> Coordinates {
        Coordinates::new(52.52, 13.405).unwrap()
    }

    fn adapter_for(server: &MockServer) -> WeatherAdapter {
        WeatherAdapter::with_config(WeatherConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn adapter_debug() {
        let adapter = WeatherAdapter::new().unwrap();
        assert!(format!("{adapter:?}").contains("WeatherAdapter"));
    }

    #[test]
    fn snapshot_maps_null_probability_to_zero() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let forecast = Forecast {
            latitude: 1.0,
            longitude: 2.0,
            timezone: None,
            utc_offset_seconds: 0,
            current: CurrentConditions {
                temperature: 7.4,
                weather_code: 3,
                wind_speed: Some(4.0),
            },
            hourly: vec![
                HourlyForecast {
                    time: t,
                    temperature: Some(7.4),
                    precipitation_probability: None,
                    relative_humidity: None,
                    apparent_temperature: None,
                    visibility: None,
                },
                HourlyForecast {
                    time: t + chrono::Duration::hours(1),
                    temperature: Some(7.0),
                    precipitation_probability: Some(55),
                    relative_humidity: None,
                    apparent_temperature: None,
                    visibility: None,
                },
            ],
            daily: Vec::new(),
        };

        let snapshot = WeatherAdapter::to_snapshot(&forecast);
        assert_eq!(snapshot.weather_code.value(), 3);
        assert_eq!(snapshot.wind_speed, Some(4.0));
        assert_eq!(snapshot.hourly[0].precipitation_probability, 0);
        assert_eq!(snapshot.hourly[1].precipitation_probability, 55);
    }

    #[test]
    fn transport_errors_map_to_network() {
        let coords = berlin();
        for err in [
            WeatherError::ConnectionFailed("refused".into()),
            WeatherError::RequestFailed("HTTP 400".into()),
            WeatherError::ServiceUnavailable("HTTP 503".into()),
            WeatherError::RateLimitExceeded,
        ] {
            let mapped = WeatherAdapter::map_error(err, &coords);
            assert!(matches!(mapped, ApplicationError::Network(_)), "{mapped:?}");
        }
    }

    #[test]
    fn parse_and_coordinate_errors_keep_their_kind() {
        let coords = berlin();
        assert!(matches!(
            WeatherAdapter::map_error(WeatherError::ParseError("eof".into()), &coords),
            ApplicationError::ExternalService(_)
        ));
        assert!(matches!(
            WeatherAdapter::map_error(WeatherError::InvalidCoordinates, &coords),
            ApplicationError::Domain(DomainError::InvalidCoordinates { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_weather_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 52.52,
                "longitude": 13.405,
                "utc_offset_seconds": 0,
                "current_weather": {"temperature": 21.6, "weathercode": 61, "windspeed": 9.0},
                "hourly": {
                    "time": ["2026-05-01T10:00", "2026-05-01T11:00"],
                    "temperature_2m": [21.6, 22.0],
                    "precipitation_probability": [null, 45]
                }
            })))
            .mount(&server)
            .await;

        let snapshot = adapter_for(&server).fetch_weather(&berlin()).await.unwrap();

        assert!((snapshot.temperature - 21.6).abs() < f64::EPSILON);
        assert_eq!(snapshot.weather_code.value(), 61);
        let probabilities: Vec<u8> = snapshot
            .hourly
            .iter()
            .map(|h| h.precipitation_probability)
            .collect();
        assert_eq!(probabilities, vec![0, 45]);
    }

    #[tokio::test]
    async fn server_error_is_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .fetch_weather(&berlin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Network(_)));
    }
}
