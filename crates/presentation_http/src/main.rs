//! Rift Sky HTTP server
//!
//! Hosts the weather worker in-process and exposes its platform events
//! over HTTP.

use std::{sync::Arc, time::Duration};

use application::{
    CacheStoragePort, ClientsPort, ForegroundBridge, GeolocationPort, NotificationPort,
    WorkerContainerPort,
};
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, Environment, InMemoryCacheStorage, InMemoryNotificationCenter,
    InMemoryWindowClients, SchedulerConfig, StaticGeolocation, TaskScheduler, WeatherAdapter,
    WorkerHost, WorkerHostConfig, WorkerPlatform, init_telemetry,
};
use presentation_http::{AppState, routes, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let _telemetry = init_telemetry(&config.telemetry_config())?;
    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!("🌦️ Rift Sky v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        environment = %config.environment(),
        weather = %config.weather.base_url,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.environment() != Environment::Production);

    // Platform surfaces
    let weather = WeatherAdapter::with_config(config.weather.to_client_config())?;
    let notifications = Arc::new(InMemoryNotificationCenter::new());
    let clients = Arc::new(InMemoryWindowClients::new());
    let caches = Arc::new(InMemoryCacheStorage::with_caches(
        config.worker.known_caches.clone(),
    ));
    let platform = WorkerPlatform {
        weather: Arc::new(weather),
        notifications: Arc::clone(&notifications) as Arc<dyn NotificationPort>,
        clients: Arc::clone(&clients) as Arc<dyn ClientsPort>,
        caches: caches as Arc<dyn CacheStoragePort>,
    };

    let scheduler = if config.worker.periodic_sync_enabled {
        Some(Arc::new(TaskScheduler::new(SchedulerConfig::default()).await?))
    } else {
        None
    };

    let mut host = WorkerHost::new(
        platform,
        WorkerHostConfig {
            dispatcher: config.dispatcher_config(),
            event_buffer_size: config.worker.event_buffer_size,
        },
    );
    if let Some(scheduler) = &scheduler {
        host = host.with_scheduler(Arc::clone(scheduler));
    }
    let host = Arc::new(host);

    let bridge = Arc::new(ForegroundBridge::new(
        Arc::clone(&host) as Arc<dyn WorkerContainerPort>,
        Arc::new(StaticGeolocation::new(config.default_coordinates())) as Arc<dyn GeolocationPort>,
        config.bridge_config(),
    ));

    if bridge.start().await.is_none() {
        warn!("Worker did not start; events will be rejected until it registers");
    }

    let cors = cors_layer(&config);
    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    let state = AppState::new(
        Arc::clone(&host),
        bridge,
        notifications,
        clients,
        config,
    );

    let mut app = routes::create_router(state).layer(TraceLayer::new_for_http());
    if let Some(cors) = cors {
        app = app.layer(cors);
    }

    let listener = TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("⏳ Draining worker for up to {:?}...", shutdown_timeout);
    if tokio::time::timeout(shutdown_timeout, host.shutdown())
        .await
        .is_err()
    {
        warn!("Worker did not drain in time");
    }
    if let Some(scheduler) = scheduler {
        match scheduler.stop().await {
            Ok(()) => info!("Scheduler stopped"),
            Err(e) => warn!(error = %e, "Failed to stop scheduler"),
        }
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.server.cors_enabled {
        return None;
    }

    if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        return Some(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
    )
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
