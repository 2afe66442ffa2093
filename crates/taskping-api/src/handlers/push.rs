//! Push registration and send endpoints (mock transport).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::transport::PushPayload;
use crate::AppState;

/// `POST /api/push/subscribe`
///
/// The body is a loose subscription object; only a non-empty `endpoint` is
/// required.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(subscription): Json<Value>,
) -> Response {
    let endpoint = subscription["endpoint"].as_str().unwrap_or("");
    if endpoint.is_empty() {
        warn!("rejecting subscription without endpoint");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Invalid subscription"})),
        )
            .into_response();
    }

    state.subscriptions.add(&subscription);
    Json(json!({
        "success": true,
        "message": "Subscription registered",
    }))
    .into_response()
}

/// `DELETE /api/push/subscribe`
///
/// Removes the identical subscription object. Acknowledged whether or not it
/// was present.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(subscription): Json<Value>,
) -> Response {
    state.subscriptions.remove(&subscription);
    Json(json!({
        "success": true,
        "message": "Subscription removed",
    }))
    .into_response()
}

/// `GET /api/push/subscribe`
pub async fn list(State(state): State<AppState>) -> Response {
    let endpoints: Vec<Value> = state
        .subscriptions
        .endpoints()
        .into_iter()
        .map(|endpoint| json!({ "endpoint": endpoint }))
        .collect();

    Json(json!({
        "count": state.subscriptions.count(),
        "subscriptions": endpoints,
    }))
    .into_response()
}

/// `POST /api/push/send` request body.
#[derive(Debug, Deserialize)]
pub struct SendPushRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<Value>,
    pub tag: Option<String>,
}

/// `POST /api/push/send`
///
/// Test/demo endpoint: fans the payload out to every registered subscription
/// through the mock transport and reports per-delivery stats.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendPushRequest>,
) -> Response {
    let title = request.title.filter(|t| !t.is_empty());
    let body = request.body.filter(|b| !b.is_empty());
    let (Some(title), Some(body)) = (title, body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Title and body are required"})),
        )
            .into_response();
    };

    let payload = PushPayload::new(title, body, request.data, request.tag);
    let endpoints = state.subscriptions.endpoints();
    let total = endpoints.len();

    let mut successful = 0usize;
    let mut failed = 0usize;
    for endpoint in &endpoints {
        match state.transport.send(endpoint, &payload).await {
            Ok(()) => successful += 1,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "push delivery failed");
                failed += 1;
            }
        }
    }

    info!(successful, failed, total, "push fan-out complete");
    Json(json!({
        "success": true,
        "message": format!("Push notification sent to {} device(s)", successful),
        "stats": { "successful": successful, "failed": failed, "total": total },
    }))
    .into_response()
}
