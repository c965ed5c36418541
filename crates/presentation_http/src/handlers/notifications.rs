//! Notification and window client endpoints

use application::WindowClient;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use domain::NotificationRequest;
use serde::Serialize;
use tracing::instrument;

use super::common::accepted;
use crate::{error::ApiError, state::AppState};

/// Visible notifications
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub count: usize,
    pub notifications: Vec<NotificationRequest>,
}

/// List notifications currently on screen
///
/// GET /v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = state.notifications.visible().await?;
    Ok(Json(NotificationsResponse {
        count: notifications.len(),
        notifications,
    }))
}

/// Report a click on a notification
///
/// POST /v1/notifications/{tag}/click
#[instrument(skip(state))]
pub async fn click_notification(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.host.notification_click(tag).await?;
    Ok(accepted("notification_click"))
}

/// Open foreground pages
#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    pub count: usize,
    pub clients: Vec<WindowClient>,
}

/// List window clients
///
/// GET /v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ClientsResponse>, ApiError> {
    let clients = state.clients.match_windows().await?;
    Ok(Json(ClientsResponse {
        count: clients.len(),
        clients,
    }))
}
