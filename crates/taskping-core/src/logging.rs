//! Structured logging field name constants for taskping.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "sync", "core"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "scheduler", "retry", "planner", "delivery", "worker"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "check_pending", "present", "reconcile", "plan"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Task identifier being operated on.
pub const TASK_ID: &str = "task_id";

/// Notification category enum variant.
pub const CATEGORY: &str = "category";

/// Notification dedup tag.
pub const TAG: &str = "tag";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Retry attempt index (zero-based).
pub const ATTEMPT: &str = "attempt";

/// Number of notification events presented or scheduled.
pub const EVENT_COUNT: &str = "event_count";

// ─── Scheduler fields ──────────────────────────────────────────────────────

/// Current polling state ("stopped", "running").
pub const POLLING_STATE: &str = "polling_state";

/// Desired polling state computed by reconciliation.
pub const DESIRED_STATE: &str = "desired_state";
