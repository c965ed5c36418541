//! Rift Sky CLI
//!
//! External entry point to a running server: fires worker events and
//! inspects the notification surface.

#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, TelemetryConfig, init_telemetry};
use serde_json::{Value, json};

const DEFAULT_URL: &str = "http://localhost:3000";

/// Rift Sky CLI
#[derive(Debug, Parser)]
#[command(name = "riftsky-cli")]
#[command(author, version, about = "Rift Sky weather worker CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Server URL
    #[arg(short, long, env = "RIFTSKY_URL", default_value = DEFAULT_URL, global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show worker status
    Status,

    /// Check readiness (exit code 1 when not ready)
    Health,

    /// Request a weather update now
    ///
    /// Without coordinates the server's configured position is used.
    Trigger {
        /// Latitude in degrees
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Relay a position to the worker
    Location {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Deliver a push message
    ///
    /// With no options the push carries no data.
    Push {
        /// Notification title
        #[arg(long, conflicts_with = "raw")]
        title: Option<String>,

        /// Notification body
        #[arg(long, conflicts_with = "raw")]
        body: Option<String>,

        /// Send this text as the push data unchanged
        #[arg(long)]
        raw: Option<String>,
    },

    /// Fire a periodic sync event
    Sync {
        /// Sync tag
        #[arg(default_value = "weather-sync")]
        tag: String,
    },

    /// Click a notification
    Click {
        /// Notification tag
        #[arg(default_value = "weather-update")]
        tag: String,
    },

    /// List visible notifications
    Notifications,

    /// List open foreground pages
    Clients,

    /// Print the effective server configuration from file and environment
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Push data for the given options, `None` for a push without data
fn push_body(title: Option<String>, body: Option<String>, raw: Option<String>) -> Option<String> {
    if raw.is_some() {
        return raw;
    }
    if title.is_none() && body.is_none() {
        return None;
    }

    let mut content = serde_json::Map::new();
    if let Some(title) = title {
        content.insert("title".to_string(), Value::String(title));
    }
    if let Some(body) = body {
        content.insert("body".to_string(), Value::String(body));
    }
    Some(Value::Object(content).to_string())
}

/// Trigger request body
fn trigger_body(lat: Option<f64>, lon: Option<f64>) -> Value {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => json!({ "latitude": latitude, "longitude": longitude }),
        _ => json!({}),
    }
}

/// Print a JSON response, failing on non-success statuses
async fn print_response(label: &str, response: reqwest::Response) -> anyhow::Result<()> {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("request failed");
        anyhow::bail!("{label} failed: HTTP {status}: {message}");
    }

    println!("{label}");
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _telemetry = init_telemetry(&TelemetryConfig {
        log_filter: log_filter_from_verbosity(cli.verbose).to_string(),
        ..TelemetryConfig::default()
    })?;

    let client = reqwest::Client::new();
    let url = cli.url;
    tracing::debug!(%url, command = ?cli.command, "Running command");

    match cli.command {
        Commands::Status => {
            let resp = client.get(endpoint_url(&url, "/v1/worker/status")).send().await?;
            print_response("📊 Worker Status:", resp).await?;
        },

        Commands::Health => match client.get(endpoint_url(&url, "/ready")).send().await {
            Ok(resp) if resp.status().is_success() => {
                println!("✅ Ready");
            },
            Ok(resp) => {
                println!("❌ Not ready: HTTP {}", resp.status());
                std::process::exit(1);
            },
            Err(e) => {
                println!("❌ Unreachable: {e}");
                std::process::exit(1);
            },
        },

        Commands::Trigger { lat, lon } => {
            let resp = client
                .post(endpoint_url(&url, "/v1/trigger"))
                .json(&trigger_body(lat, lon))
                .send()
                .await?;
            print_response("🌦️ Weather update triggered:", resp).await?;
        },

        Commands::Location { lat, lon } => {
            let resp = client
                .post(endpoint_url(&url, "/v1/location"))
                .json(&json!({ "latitude": lat, "longitude": lon }))
                .send()
                .await?;
            print_response("📍 Location relayed:", resp).await?;
        },

        Commands::Push { title, body, raw } => {
            let mut request = client.post(endpoint_url(&url, "/v1/push"));
            if let Some(data) = push_body(title, body, raw) {
                request = request.body(data);
            }
            print_response("📨 Push delivered:", request.send().await?).await?;
        },

        Commands::Sync { tag } => {
            let resp = client
                .post(endpoint_url(&url, &format!("/v1/sync/{tag}")))
                .send()
                .await?;
            print_response("🔄 Periodic sync fired:", resp).await?;
        },

        Commands::Click { tag } => {
            let resp = client
                .post(endpoint_url(&url, &format!("/v1/notifications/{tag}/click")))
                .send()
                .await?;
            print_response("👆 Notification clicked:", resp).await?;
        },

        Commands::Notifications => {
            let resp = client.get(endpoint_url(&url, "/v1/notifications")).send().await?;
            print_response("🔔 Visible notifications:", resp).await?;
        },

        Commands::Clients => {
            let resp = client.get(endpoint_url(&url, "/v1/clients")).send().await?;
            print_response("🪟 Open pages:", resp).await?;
        },

        Commands::Config => {
            let config = AppConfig::load()?;
            println!("⚙️ Effective configuration:");
            println!("{}", serde_json::to_string_pretty(&config)?);
        },
    }

    Ok(())
}
