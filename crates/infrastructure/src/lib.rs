//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Open-Meteo
//! weather adapter, the in-process platform surfaces and the worker host
//! that runs the worker. Also owns configuration loading, logging setup
//! and the cron scheduler behind periodic sync.

pub mod adapters;
pub mod config;
pub mod scheduler;
pub mod telemetry;
pub mod worker_host;

pub use adapters::*;
pub use config::{
    AppConfig, Environment, GeoLocationConfig, NotificationAppConfig, ServerConfig,
    WeatherConfig as WeatherAppConfig, WorkerAppConfig,
};
pub use scheduler::{
    SchedulerConfig, SchedulerError, TaskScheduler, TaskStats,
    interval_to_cron, schedules,
};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
pub use worker_host::{
    DEFAULT_EVENT_BUFFER_SIZE, WorkerHost, WorkerHostConfig, WorkerPlatform, WorkerStatus,
};
