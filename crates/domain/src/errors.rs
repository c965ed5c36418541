//! Domain-level errors

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Coordinates outside ±90 / ±180
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Push payload present but not the expected JSON
    #[error("Malformed push payload: {0}")]
    MalformedPushPayload(String),

    /// Worker message with an unknown type or missing fields
    #[error("Invalid worker message: {0}")]
    InvalidMessage(String),
}

impl DomainError {
    /// Create an invalid coordinates error carrying the rejected values
    pub const fn invalid_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::InvalidCoordinates {
            latitude,
            longitude,
        }
    }
}

impl From<InvalidCoordinates> for DomainError {
    fn from(err: InvalidCoordinates) -> Self {
        Self::invalid_coordinates(err.latitude, err.longitude)
    }
}
