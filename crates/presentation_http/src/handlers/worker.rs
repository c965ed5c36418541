//! Worker messaging, periodic sync and status endpoints

use application::WorkerContainerPort;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use domain::WorkerMessage;
use infrastructure::WorkerStatus;
use tracing::{info, instrument};

use super::common::accepted;
use crate::{error::ApiError, state::AppState};

/// Post a foreground message to the controlling worker
///
/// POST /v1/worker/messages
///
/// Body is a message tagged by `type`, e.g.
/// `{"type": "SET_COORDINATES", "lat": 52.52, "lon": 13.405}`.
#[instrument(skip(state, body))]
pub async fn post_message(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let message = WorkerMessage::from_json(body).map_err(application::ApplicationError::from)?;
    let event = match &message {
        WorkerMessage::SetCoordinates { .. } => "set_coordinates",
        WorkerMessage::ManualWeatherUpdate { .. } => "manual_update",
    };

    state.host.post_to_controller(message).await?;
    info!(event, "Worker message posted");
    Ok(accepted(event))
}

/// Fire a periodic sync event
///
/// POST /v1/sync/{tag}
#[instrument(skip(state))]
pub async fn periodic_sync(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if tag.trim().is_empty() {
        return Err(ApiError::BadRequest("Sync tag must not be empty".to_string()));
    }

    state.host.periodic_sync(tag).await?;
    Ok(accepted("periodic_sync"))
}

/// Current worker host status
///
/// GET /v1/worker/status
pub async fn status(State(state): State<AppState>) -> Json<WorkerStatus> {
    Json(state.host.status())
}
