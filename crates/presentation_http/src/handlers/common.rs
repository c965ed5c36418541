//! Shared response types for handlers that hand work to the worker

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body returned when an event was queued for the worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedResponse {
    /// Always true; failures use the error body instead
    pub accepted: bool,
    /// Event kind that was queued
    pub event: String,
}

/// `202 Accepted` with an [`AcceptedResponse`] body
pub fn accepted(event: &str) -> (StatusCode, Json<AcceptedResponse>) {
    (
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            accepted: true,
            event: event.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn accepted_response_status() {
        let response = accepted("push").into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn accepted_response_serialization() {
        let json = serde_json::to_value(AcceptedResponse {
            accepted: true,
            event: "periodic_sync".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"accepted": true, "event": "periodic_sync"}));
    }
}
