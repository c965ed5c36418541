//! Domain layer for Rift Sky
//!
//! Contains the weather notification vocabulary: coordinates, weather
//! snapshots, derived alerts, notification requests and the worker triggers.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod triggers;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use triggers::{PushContent, PushPayload, Trigger, WEATHER_SYNC_TAG, WorkerMessage};
pub use value_objects::*;
