//! taskping-api - HTTP server exposing the mock notification source, push
//! registration, and push send endpoints.
//!
//! The router is assembled here so integration tests (and the binary) can
//! serve the same application on any listener.

pub mod handlers;
pub mod store;
pub mod subscriptions;
pub mod transport;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use taskping_core::NotificationStore;

pub use store::InMemoryNotificationStore;
pub use subscriptions::SubscriptionRegistry;
pub use transport::{MockPushTransport, PushPayload, PushTransport};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NotificationStore>,
    pub subscriptions: Arc<SubscriptionRegistry>,
    pub transport: Arc<dyn PushTransport>,
    /// Probability that an empty notify queue synthesizes a demo payload.
    pub demo_chance: f64,
}

impl AppState {
    /// State with in-memory stores and the mock transport.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryNotificationStore::new()),
            subscriptions: Arc::new(SubscriptionRegistry::new()),
            transport: Arc::new(MockPushTransport),
            demo_chance: taskping_core::defaults::DEMO_NOTIFICATION_CHANCE,
        }
    }

    pub fn with_demo_chance(mut self, chance: f64) -> Self {
        self.demo_chance = chance;
        self
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    // The mock endpoints are development surfaces; CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/notify",
            get(handlers::notify::check).post(handlers::notify::enqueue),
        )
        .route(
            "/api/push/subscribe",
            post(handlers::push::subscribe)
                .delete(handlers::push::unsubscribe)
                .get(handlers::push::list),
        )
        .route("/api/push/send", post(handlers::push::send))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "taskping-api",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
