//! Core traits for taskping abstractions.
//!
//! These traits define the seams between the pipeline and its collaborators,
//! enabling pluggable backends and testability: the notification source
//! (unreliable, external), the presenter (side-effect-only notification
//! surface), the injected mock-queue storage, and the best-effort
//! background-sync registration.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NotificationCheckResult, NotificationEvent};

// =============================================================================
// NOTIFICATION SOURCE
// =============================================================================

/// An endpoint that can be asked whether notifications are pending.
///
/// Treated as unreliable: calls may fail or be slow, and failure is a
/// first-class outcome the retry controller handles. Each call is
/// independent, idempotent, and read-only; no ordering is guaranteed between
/// successive calls.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn check_pending(&self) -> Result<NotificationCheckResult>;
}

// =============================================================================
// PRESENTER
// =============================================================================

/// The notification surface.
///
/// `present` must not block and must not fail: when the platform lacks
/// notification support or permission is not granted it degrades to a no-op,
/// so callers are not required to pre-check.
pub trait Presenter: Send + Sync {
    fn present(&self, event: NotificationEvent);
}

/// Presenter that drops everything. Useful for wiring and tests.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&self, _event: NotificationEvent) {}
}

// =============================================================================
// NOTIFICATION STORE
// =============================================================================

/// Storage behind the mock notification endpoint.
///
/// Injected instead of process-global state so the same pipeline can be
/// tested against an in-memory fake without state bleeding between cases.
/// FIFO: at most one enqueued item is consumed per dequeue.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn enqueue(&self, payload: NotificationCheckResult) -> Result<()>;
    async fn dequeue_one(&self) -> Result<Option<NotificationCheckResult>>;
}

// =============================================================================
// BACKGROUND SYNC REGISTRATION
// =============================================================================

/// Best-effort registration of a platform background-sync capability.
///
/// The scheduler attempts registration when it enters the running state;
/// failure is logged and never affects the state machine.
#[async_trait]
pub trait SyncRegistration: Send + Sync {
    async fn register(&self, tag: &str) -> Result<()>;
}

/// Registration stub for platforms without a background-sync capability.
pub struct NoopSyncRegistration;

#[async_trait]
impl SyncRegistration for NoopSyncRegistration {
    async fn register(&self, tag: &str) -> Result<()> {
        tracing::debug!(tag, "background sync registration not supported, skipping");
        Ok(())
    }
}
