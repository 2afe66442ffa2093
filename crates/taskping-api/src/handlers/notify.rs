//! Notification check endpoint: the mock Notification Source.
//!
//! `GET` consumes at most one enqueued payload (FIFO); an empty queue yields
//! a "nothing pending" result, optionally replaced by a canned demo payload
//! at a configured random chance. `POST` enqueues a payload for the next
//! `GET`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use taskping_core::{NotificationCheckResult, Priority, SourceTask};

use crate::AppState;

/// `GET /api/notify`
pub async fn check(State(state): State<AppState>) -> Response {
    match state.store.dequeue_one().await {
        Ok(Some(payload)) => Json(payload).into_response(),
        Ok(None) => {
            if state.demo_chance > 0.0 && rand::random::<f64>() < state.demo_chance {
                debug!("synthesizing demo notification payload");
                return Json(demo_payload()).into_response();
            }
            Json(NotificationCheckResult::empty()).into_response()
        }
        Err(e) => {
            error!(error = %e, "notification check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "hasNotifications": false,
                    "error": "Internal server error",
                    "timestamp": chrono::Utc::now().timestamp_millis(),
                })),
            )
                .into_response()
        }
    }
}

/// `POST /api/notify` request body.
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    /// Advisory payload type; recorded in logs only.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub tasks: Option<Vec<SourceTask>>,
}

/// `POST /api/notify`
pub async fn enqueue(
    State(state): State<AppState>,
    Json(request): Json<EnqueueRequest>,
) -> Response {
    debug!(kind = request.kind.as_deref().unwrap_or("unspecified"), "enqueueing notification");

    let payload = NotificationCheckResult::pending(
        Some(request.message.unwrap_or_else(|| "New notification".to_string())),
        request.tasks.unwrap_or_default(),
    );

    match state.store.enqueue(payload).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Notification queued",
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "failed to enqueue notification");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

/// Canned payload for manual testing of the delivery pipeline.
fn demo_payload() -> NotificationCheckResult {
    NotificationCheckResult::pending(
        Some("You have new tasks to review!".to_string()),
        vec![
            SourceTask {
                id: format!("task-{}", Uuid::new_v4()),
                title: "Review monthly report".to_string(),
                kind: "reminder".to_string(),
                priority: Priority::High,
            },
            SourceTask {
                id: format!("task-{}", Uuid::new_v4()),
                title: "Team meeting".to_string(),
                kind: "overdue".to_string(),
                priority: Priority::Medium,
            },
        ],
    )
}
