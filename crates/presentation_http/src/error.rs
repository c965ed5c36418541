//! API error handling
//!
//! Error bodies are JSON `{error, code, details?}`. Outside development the
//! messages are sanitized so upstream URLs and file paths never reach the
//! caller.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are included in responses
///
/// Production deployments should pass `false`.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Replace messages that look like they carry infrastructure details
fn sanitize_error_message(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/users/",
        "/var/",
        "/etc/",
        "c:\\",
        "://",
        "panicked at",
        ".rs:",
        "connection refused",
        "timed out",
        "timeout",
        "dns error",
    ];

    let lower = msg.to_lowercase();
    if sensitive_patterns.iter().any(|p| lower.contains(p)) {
        return GENERIC_MESSAGE.to_string();
    }
    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Worker not ready: {0}")]
    WorkerNotReady(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional details, development only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::WorkerNotReady(_) | Self::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self, expose: bool) -> ErrorResponse {
        let (code, error, details) = match self {
            Self::BadRequest(msg) => ("bad_request", sanitize_error_message(msg, expose), None),
            Self::NotFound(msg) => ("not_found", sanitize_error_message(msg, expose), None),
            Self::WorkerNotReady(msg) => (
                "worker_not_ready",
                sanitize_error_message(msg, expose),
                None,
            ),
            Self::ServiceUnavailable(msg) => {
                let error = if expose {
                    msg.clone()
                } else {
                    "Service temporarily unavailable".to_string()
                };
                ("service_unavailable", error, None)
            },
            Self::Internal(msg) => (
                "internal_error",
                "An internal error occurred".to_string(),
                expose.then(|| msg.clone()),
            ),
        };

        ErrorResponse {
            error,
            code: code.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }
        (status, Json(self.body(should_expose_details()))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotReady(msg) => Self::WorkerNotReady(msg),
            ApplicationError::UnsupportedPlatform(msg)
            | ApplicationError::Network(msg)
            | ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::DomainError;

    use super::*;

    #[test]
    fn api_error_messages() {
        assert_eq!(
            ApiError::BadRequest("bad tag".into()).to_string(),
            "Bad request: bad tag"
        );
        assert_eq!(
            ApiError::WorkerNotReady("installing".into()).to_string(),
            "Worker not ready: installing"
        );
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::BadRequest(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::WorkerNotReady(String::new()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_are_bad_requests() {
        let err: ApiError =
            ApplicationError::Domain(DomainError::InvalidMessage("unknown type".into())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn not_ready_maps_to_worker_not_ready() {
        let err: ApiError = ApplicationError::NotReady("no worker".into()).into();
        assert!(matches!(err, ApiError::WorkerNotReady(_)));
    }

    #[test]
    fn upstream_failures_are_unavailable() {
        let network: ApiError = ApplicationError::Network("503".into()).into();
        let platform: ApiError = ApplicationError::UnsupportedPlatform("no sync".into()).into();
        assert!(matches!(network, ApiError::ServiceUnavailable(_)));
        assert!(matches!(platform, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn configuration_is_internal() {
        let err: ApiError = ApplicationError::Configuration("bad interval".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn internal_details_hidden_when_not_exposed() {
        let body = ApiError::Internal("task panicked".into()).body(false);
        assert_eq!(body.code, "internal_error");
        assert!(body.details.is_none());

        let body = ApiError::Internal("task panicked".into()).body(true);
        assert_eq!(body.details.as_deref(), Some("task panicked"));
    }

    #[test]
    fn unavailable_message_generic_when_not_exposed() {
        let body = ApiError::ServiceUnavailable("open-meteo down".into()).body(false);
        assert_eq!(body.error, "Service temporarily unavailable");
    }

    #[test]
    fn sanitize_hides_urls_and_paths() {
        assert_eq!(
            sanitize_error_message("error sending request for url (https://api.open-meteo.com/v1)", false),
            GENERIC_MESSAGE
        );
        assert_eq!(
            sanitize_error_message("failed to read /etc/riftsky/config.toml", false),
            GENERIC_MESSAGE
        );
        assert_eq!(sanitize_error_message("operation timed out", false), GENERIC_MESSAGE);
    }

    #[test]
    fn sanitize_keeps_plain_messages() {
        assert_eq!(
            sanitize_error_message("Unknown message type", false),
            "Unknown message type"
        );
    }

    #[test]
    fn sanitize_passes_everything_when_exposed() {
        let msg = "failed at /home/pi/app";
        assert_eq!(sanitize_error_message(msg, true), msg);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "x".into(),
            code: "bad_request".into(),
            details: None,
        })
        .unwrap();
        assert!(!json.contains("details"));
    }
}
