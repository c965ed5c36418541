//! Push delivery endpoint
//!
//! Stands in for the push service: the raw request body is the push data.

use axum::{body::Bytes, extract::State, response::IntoResponse};
use domain::PushPayload;
use tracing::{info, instrument};

use super::common::accepted;
use crate::{error::ApiError, state::AppState};

/// Deliver a push message to the worker
///
/// POST /v1/push
///
/// An empty body is a push without data. Malformed data is still delivered;
/// the worker falls back to the weather alert for it.
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn push(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let payload = if body.is_empty() {
        PushPayload::empty()
    } else {
        PushPayload::from_bytes(body.to_vec())
    };

    state.host.push(payload).await?;
    info!("Push queued");
    Ok(accepted("push"))
}
