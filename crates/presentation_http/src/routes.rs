//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes
///
/// Request ids and the body size limit are applied here; CORS and HTTP
/// tracing are added by the server binary.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_bytes;

    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Worker events (v1)
        .route("/v1/push", post(handlers::push::push))
        .route("/v1/worker/messages", post(handlers::worker::post_message))
        .route("/v1/worker/status", get(handlers::worker::status))
        .route("/v1/sync/{tag}", post(handlers::worker::periodic_sync))
        // Foreground bridge (v1)
        .route("/v1/location", post(handlers::location::update_location))
        .route("/v1/trigger", post(handlers::location::manual_trigger))
        // Notifications and pages (v1)
        .route(
            "/v1/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/v1/notifications/{tag}/click",
            post(handlers::notifications::click_notification),
        )
        .route("/v1/clients", get(handlers::notifications::list_clients))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(RequestIdLayer::new())
        .with_state(state)
}
