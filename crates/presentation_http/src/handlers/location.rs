//! Location and manual trigger endpoints
//!
//! Both go through the foreground bridge, the same way the app's own
//! startup sequence reaches the worker.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use domain::Coordinates;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use super::common::accepted;
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Request body for relaying a position
#[derive(Debug, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
}

/// Position as relayed to the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LocationResponse {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
        }
    }
}

/// Relay a position to the controlling worker
///
/// POST /v1/location
#[instrument(skip(state, request), fields(lat = request.latitude, lon = request.longitude))]
pub async fn update_location(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coordinates = Coordinates::new(request.latitude, request.longitude)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if !state.bridge.send_coordinates(coordinates).await {
        return Err(ApiError::WorkerNotReady(
            "No worker controls this page".to_string(),
        ));
    }

    info!("Location relayed");
    Ok((StatusCode::ACCEPTED, Json(LocationResponse::from(coordinates))))
}

/// Optional body of a manual trigger
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TriggerRequest {
    fn coordinates(&self) -> Result<Option<Coordinates>, ApiError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .map(Some)
                .map_err(|e| ApiError::BadRequest(e.to_string())),
            (None, None) => Ok(None),
            _ => Err(ApiError::BadRequest(
                "latitude and longitude must be given together".to_string(),
            )),
        }
    }
}

/// Manual weather update
///
/// POST /v1/trigger
///
/// Without coordinates the host's position source is asked first.
#[instrument(skip(state, body))]
pub async fn manual_trigger(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: TriggerRequest = if body.iter().all(u8::is_ascii_whitespace) {
        TriggerRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid trigger body: {e}")))?
    };

    state.manual_trigger.invoke(request.coordinates()?).await?;
    Ok(accepted("manual_update"))
}
