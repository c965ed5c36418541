//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Transport failure or non-success response from the forecast provider
    #[error("Network error: {0}")]
    Network(String),

    /// Host platform lacks a required capability
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Worker is not active yet
    #[error("Worker not ready: {0}")]
    NotReady(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
