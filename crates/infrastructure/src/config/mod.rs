//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `weather`: Open-Meteo provider and default location
//! - `worker`: worker host and notification presentation
//!
//! Sources are layered: built-in defaults, an optional `config.toml` in the
//! working directory, then `RIFTSKY_*` environment variables using `__` to
//! separate nested keys (e.g. `RIFTSKY_SERVER__PORT=8080`).

mod server;
mod weather;
mod worker;

use std::fmt;

use application::{BridgeConfig, DispatcherConfig};
use domain::Coordinates;
use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryConfig;

pub use server::ServerConfig;
pub use weather::{GeoLocationConfig, WeatherConfig};
pub use worker::{NotificationAppConfig, WorkerAppConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RIFTSKY";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Notification presentation
    #[serde(default)]
    pub notification: NotificationAppConfig,

    /// Worker host settings
    #[serde(default)]
    pub worker: WorkerAppConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = Self::builder()?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., RIFTSKY_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .with_list_parse_key("worker.known_caches")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Builder pre-populated with the defaults every layer starts from
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("weather.base_url", "https://api.open-meteo.com/v1")?
            .set_default("worker.cache_version", application::DEFAULT_CACHE_VERSION)?
            .set_default("worker.scope", "/")
    }

    /// Effective environment (development when unset)
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Logging settings with the server-level format override applied
    #[must_use]
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let mut telemetry = self.telemetry.clone();
        if let Some(format) = self.server.log_format {
            telemetry.log_format = format;
        }
        telemetry
    }

    /// Settings for the worker's trigger dispatcher
    #[must_use]
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            cache_version: self.worker.cache_version.clone(),
            root_url: self.worker.scope.clone(),
            icon: self.notification.icon.clone(),
            badge: self.notification.badge.clone(),
            default_title: self.notification.default_title.clone(),
            default_body: self.notification.default_body.clone(),
        }
    }

    /// Settings for the foreground bridge
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            scope: self.worker.scope.clone(),
            manual_trigger_delay: self.worker.manual_trigger_delay(),
            periodic_sync_enabled: self.worker.periodic_sync_enabled,
        }
    }

    /// Configured default location, if present and in range
    #[must_use]
    pub fn default_coordinates(&self) -> Option<Coordinates> {
        self.weather
            .default_location
            .as_ref()
            .and_then(GeoLocationConfig::to_coordinates)
    }
}
