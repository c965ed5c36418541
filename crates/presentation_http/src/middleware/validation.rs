//! Request validation
//!
//! `ValidatedJson` deserializes a JSON body and runs its `validator` rules
//! before the handler sees it. Failures use the same body shape as
//! [`crate::error::ApiError`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ErrorResponse;

/// Validation error type
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::JsonError(e) => ("invalid_json", e.body_text()),
            Self::ValidationFailed(msg) => ("validation_error", msg),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details: None,
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// JSON extractor that also validates the request body
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct LocationRequest {
///     #[validate(range(min = -90.0, max = 90.0))]
///     latitude: f64,
/// }
///
/// async fn handler(ValidatedJson(req): ValidatedJson<LocationRequest>) {}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|e| ValidationError::ValidationFailed(describe(&e)))?;
        Ok(Self(value))
    }
}

/// Flatten field errors into `field: message` pairs, sorted by field
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
