//! taskping-api - HTTP server for the taskping notification pipeline.
//!
//! Serves the mock endpoints and, when enabled, runs the foreground polling
//! pipeline against its own notify endpoint so a single process demonstrates
//! the whole delivery path: poll, retry, stagger, present.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskping_api::{app, AppState};
use taskping_core::defaults::{ENV_DEMO_CHANCE, ENV_SETTINGS_PATH, SERVER_PORT};
use taskping_core::SettingsStore;
use taskping_sync::{
    DeliveryEvent, DeliveryHub, DeliveryOrigin, DeliveryPresenter, HttpNotificationSource,
    PollingScheduler, SchedulerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "taskping=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskping=debug,taskping_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("taskping-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(SERVER_PORT);
    let demo_chance: f64 = std::env::var(ENV_DEMO_CHANCE)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(taskping_core::defaults::DEMO_NOTIFICATION_CHANCE);

    let state = AppState::in_memory().with_demo_chance(demo_chance);
    let router = app(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "taskping-api listening");

    // Notification settings, persisted next to the process by default
    let settings_path = std::env::var(ENV_SETTINGS_PATH)
        .unwrap_or_else(|_| "taskping-settings.json".to_string());
    let settings = Arc::new(SettingsStore::load(settings_path)?);
    if !settings.get().enabled {
        info!("notifications are disabled in settings; polling checks will be skipped");
    }

    // Foreground pipeline polling our own notify endpoint
    let hub = DeliveryHub::new(taskping_core::defaults::DELIVERY_BUS_CAPACITY);
    let presenter = Arc::new(
        DeliveryPresenter::granted(hub.clone(), DeliveryOrigin::Foreground)
            .with_settings(settings.clone()),
    );
    let source_host = if host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        host.as_str()
    };
    let source = Arc::new(HttpNotificationSource::new(format!(
        "http://{}:{}",
        source_host, port
    ))?);
    let poll_config = SchedulerConfig::from_env();
    let poll_enabled = poll_config.enabled;
    let scheduler = PollingScheduler::new(source, presenter, settings, poll_config);
    if poll_enabled {
        scheduler.start();
    }

    // Bridge presented notifications into the log, the way a tray
    // integration would consume them
    let mut deliveries = hub.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = deliveries.recv().await {
            if let DeliveryEvent::Presented { event, origin, .. } = event {
                info!(
                    tag = %event.tag,
                    origin,
                    title = %event.title,
                    body = %event.body,
                    "notification presented"
                );
            }
        }
    });

    axum::serve(listener, router).await?;
    Ok(())
}
