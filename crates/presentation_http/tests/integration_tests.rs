//! Integration tests for the HTTP surface
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use application::{
    ApplicationError, BridgeConfig, CacheStoragePort, ClientsPort, ForegroundBridge,
    GeolocationPort, NotificationPort, WeatherPort, WorkerContainerPort,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use domain::{Coordinates, HourlySample, WeatherCode, WeatherSnapshot};
use infrastructure::{
    AppConfig, InMemoryCacheStorage, InMemoryNotificationCenter, InMemoryWindowClients,
    StaticGeolocation, WorkerHost, WorkerHostConfig, WorkerPlatform,
};
use presentation_http::{AppState, create_router};
use serde_json::json;

const WEATHER_TITLE: &str = "22°C - Slight rain";
const WEATHER_BODY: &str = "⚠️ 45% chance of rain in the next 4 hours";

/// Forecast source with a fixed answer
struct FixedWeather;

#[async_trait]
impl WeatherPort for FixedWeather {
    async fn fetch_weather(
        &self,
        _coordinates: &Coordinates,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let now = fixed_now();
        Ok(
            WeatherSnapshot::new(21.6, WeatherCode::new(61)).with_hourly(vec![
                HourlySample::new(now + chrono::Duration::hours(1), 10),
                HourlySample::new(now + chrono::Duration::hours(2), 45),
            ]),
        )
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap()
}

struct Harness {
    server: TestServer,
    host: Arc<WorkerHost>,
    notifications: Arc<InMemoryNotificationCenter>,
}

impl Harness {
    /// Stop the worker after letting queued events finish
    async fn drain(&self) {
        self.host.shutdown().await;
    }
}

async fn harness_with(config: AppConfig, started: bool) -> Harness {
    let notifications = Arc::new(InMemoryNotificationCenter::new());
    let clients = Arc::new(InMemoryWindowClients::new());
    let platform = WorkerPlatform {
        weather: Arc::new(FixedWeather),
        notifications: Arc::clone(&notifications) as Arc<dyn NotificationPort>,
        clients: Arc::clone(&clients) as Arc<dyn ClientsPort>,
        caches: Arc::new(InMemoryCacheStorage::new()) as Arc<dyn CacheStoragePort>,
    };
    let host = Arc::new(
        WorkerHost::new(
            platform,
            WorkerHostConfig {
                dispatcher: config.dispatcher_config(),
                ..WorkerHostConfig::default()
            },
        )
        .with_clock(fixed_now),
    );

    let bridge = Arc::new(ForegroundBridge::new(
        Arc::clone(&host) as Arc<dyn WorkerContainerPort>,
        Arc::new(StaticGeolocation::new(None)) as Arc<dyn GeolocationPort>,
        BridgeConfig {
            manual_trigger_delay: Duration::ZERO,
            periodic_sync_enabled: false,
            ..config.bridge_config()
        },
    ));
    if started {
        bridge.start().await.expect("worker starts");
    }

    let state = AppState::new(
        Arc::clone(&host),
        bridge,
        Arc::clone(&notifications) as Arc<dyn NotificationPort>,
        clients as Arc<dyn ClientsPort>,
        config,
    );
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    Harness {
        server,
        host,
        notifications,
    }
}

async fn started() -> Harness {
    harness_with(AppConfig::default(), true).await
}

async fn not_started() -> Harness {
    harness_with(AppConfig::default(), false).await
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_returns_ok() {
    let harness = not_started().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn ready_is_unavailable_without_worker() {
    let harness = not_started().await;

    let response = harness.server.get("/ready").await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["worker"]["registered"], false);
}

#[tokio::test]
async fn ready_after_worker_activation() {
    let harness = started().await;

    let response = harness.server.get("/ready").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["worker"]["state"], "ready");
    assert_eq!(body["worker"]["scope"], "/");
}

// ============================================================================
// Push
// ============================================================================

#[tokio::test]
async fn push_with_content_is_shown_verbatim() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/push")
        .text(r#"{"title":"Storm warning","body":"Stay indoors"}"#)
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body, json!({"accepted": true, "event": "push"}));

    harness.drain().await;
    let visible = harness.notifications.visible().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Storm warning");
    assert_eq!(visible[0].body, "Stay indoors");
}

#[tokio::test]
async fn empty_push_without_coordinates_uses_defaults() {
    let harness = started().await;

    let response = harness.server.post("/v1/push").await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    let visible = harness.notifications.visible().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Rift Sky Weather");
    assert_eq!(visible[0].body, "Weather update available");
}

#[tokio::test]
async fn push_without_worker_is_rejected() {
    let harness = not_started().await;

    let response = harness.server.post("/v1/push").await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "worker_not_ready");
}

#[tokio::test]
async fn oversized_push_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_body_size_bytes = 16;
    let harness = harness_with(config, true).await;

    let response = harness
        .server
        .post("/v1/push")
        .text("x".repeat(1024))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    harness.drain().await;
    assert!(harness.notifications.visible().await.unwrap().is_empty());
}

// ============================================================================
// Location, messages and periodic sync
// ============================================================================

#[tokio::test]
async fn location_then_sync_shows_weather_alert() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/location")
        .json(&json!({"latitude": 52.52, "longitude": 13.405}))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["latitude"], 52.52);

    let response = harness.server.post("/v1/sync/weather-sync").await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    let response = harness.server.get("/v1/notifications").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["notifications"][0]["title"], WEATHER_TITLE);
    assert_eq!(body["notifications"][0]["body"], WEATHER_BODY);
    assert_eq!(body["notifications"][0]["tag"], "weather-update");
}

#[tokio::test]
async fn unrelated_sync_tag_is_accepted_but_ignored() {
    let harness = started().await;
    harness
        .server
        .post("/v1/location")
        .json(&json!({"latitude": 52.52, "longitude": 13.405}))
        .await;

    let response = harness.server.post("/v1/sync/content-refresh").await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    assert!(harness.notifications.visible().await.unwrap().is_empty());
}

#[tokio::test]
async fn location_out_of_range_is_rejected() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/location")
        .json(&json!({"latitude": 123.0, "longitude": 13.405}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn location_without_worker_is_rejected() {
    let harness = not_started().await;

    let response = harness
        .server
        .post("/v1/location")
        .json(&json!({"latitude": 52.52, "longitude": 13.405}))
        .await;

    response.assert_status_service_unavailable();
}

#[tokio::test]
async fn set_coordinates_message_feeds_later_push() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/worker/messages")
        .json(&json!({"type": "SET_COORDINATES", "lat": 52.52, "lon": 13.405}))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["event"], "set_coordinates");

    harness.server.post("/v1/push").await;

    harness.drain().await;
    let visible = harness.notifications.visible().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, WEATHER_TITLE);
}

#[tokio::test]
async fn manual_update_message_with_coordinates_notifies() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/worker/messages")
        .json(&json!({"type": "MANUAL_WEATHER_UPDATE", "lat": 52.52, "lon": 13.405}))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    let visible = harness.notifications.visible().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].body, WEATHER_BODY);
}

#[tokio::test]
async fn unknown_message_type_is_rejected() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/worker/messages")
        .json(&json!({"type": "SELF_DESTRUCT"}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn message_with_invalid_coordinates_is_rejected() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/worker/messages")
        .json(&json!({"type": "SET_COORDINATES", "lat": 95.0, "lon": 0.0}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn worker_status_reports_registration() {
    let harness = started().await;

    let response = harness.server.get("/v1/worker/status").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["registered"], true);
    assert_eq!(body["state"], "ready");
    assert_eq!(body["periodic_syncs"], json!([]));
}

// ============================================================================
// Manual trigger
// ============================================================================

#[tokio::test]
async fn manual_trigger_with_coordinates_notifies() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/trigger")
        .json(&json!({"latitude": 52.52, "longitude": 13.405}))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    let visible = harness.notifications.visible().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, WEATHER_TITLE);
}

#[tokio::test]
async fn manual_trigger_without_position_source_fails() {
    let harness = started().await;

    let response = harness.server.post("/v1/trigger").await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "service_unavailable");
}

#[tokio::test]
async fn manual_trigger_with_half_coordinates_is_rejected() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/trigger")
        .json(&json!({"latitude": 52.52}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn manual_trigger_without_worker_is_rejected() {
    let harness = not_started().await;

    let response = harness
        .server
        .post("/v1/trigger")
        .json(&json!({"latitude": 52.52, "longitude": 13.405}))
        .await;

    response.assert_status_service_unavailable();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "worker_not_ready");
}

// ============================================================================
// Notification clicks and clients
// ============================================================================

#[tokio::test]
async fn click_opens_root_page() {
    let harness = started().await;

    let response = harness
        .server
        .post("/v1/notifications/weather-update/click")
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    harness.drain().await;
    let response = harness.server.get("/v1/clients").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["clients"][0]["url"], "/");
    assert_eq!(body["clients"][0]["focused"], true);
}

#[tokio::test]
async fn notifications_empty_initially() {
    let harness = started().await;

    let response = harness.server.get("/v1/notifications").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 0);
    assert_eq!(body["notifications"], json!([]));
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn responses_carry_request_id() {
    let harness = not_started().await;

    let response = harness.server.get("/health").await;

    let id = response
        .headers()
        .get("x-request-id")
        .expect("request id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let harness = started().await;

    let response = harness.server.get("/v1/unknown").await;

    response.assert_status_not_found();
}
