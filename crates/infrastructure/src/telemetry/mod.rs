//! Logging initialization
//!
//! Installs the global `tracing` subscriber with an `EnvFilter` and either a
//! human-readable or a JSON formatter.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, TelemetryGuard, init_telemetry};
