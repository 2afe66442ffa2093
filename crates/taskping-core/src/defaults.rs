//! Centralized default constants for the taskping system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// POLLING
// =============================================================================

/// Default foreground polling interval in milliseconds.
///
/// One check per minute keeps reminders timely without hammering the mock
/// notification endpoint.
pub const POLL_INTERVAL_MS: u64 = 60_000;

// =============================================================================
// RETRY
// =============================================================================

/// Default maximum attempts for a single notification check.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay in seconds. Attempt `i` (zero-based) waits
/// `RETRY_BASE_DELAY_SECS * 2^i` before the next attempt.
pub const RETRY_BASE_DELAY_SECS: u64 = 1;

// =============================================================================
// DELIVERY
// =============================================================================

/// Delay between successive staggered notification presentations, in
/// milliseconds. One second keeps a burst of task notifications individually
/// legible.
pub const STAGGER_DELAY_MS: u64 = 1_000;

/// Auto-dismiss window for foreground-presented notifications, in seconds.
/// Categories that require interaction are exempt.
pub const AUTO_DISMISS_SECS: u64 = 5;

/// Default delivery event bus broadcast channel capacity.
pub const DELIVERY_BUS_CAPACITY: usize = 256;

// =============================================================================
// PLANNING
// =============================================================================

/// Window for "due soon" reminders, in hours.
pub const UPCOMING_WINDOW_HOURS: i64 = 24;

/// Default daily-summary time of day (24h clock, `HH:MM`).
pub const REMINDER_TIME: &str = "09:00";

// =============================================================================
// SOURCE
// =============================================================================

/// HTTP notification source request timeout in seconds. The contract does not
/// require a timeout; this is hardening against a hung mock endpoint.
pub const SOURCE_TIMEOUT_SECS: u64 = 30;

/// Tag used when registering the platform background-sync capability.
pub const BACKGROUND_SYNC_TAG: &str = "background-sync";

/// Tag used when registering the periodic check capability.
pub const PERIODIC_SYNC_TAG: &str = "check-notifications";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Probability (0.0–1.0) that an empty notify queue synthesizes a demo
/// payload. Off by default; the canned data exists for manual testing only.
pub const DEMO_NOTIFICATION_CHANCE: f64 = 0.0;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Enable/disable the foreground polling scheduler.
pub const ENV_POLL_ENABLED: &str = "TASKPING_POLL_ENABLED";

/// Override the foreground polling interval (milliseconds).
pub const ENV_POLL_INTERVAL_MS: &str = "TASKPING_POLL_INTERVAL_MS";

/// Override the demo payload chance on the notify endpoint.
pub const ENV_DEMO_CHANCE: &str = "TASKPING_DEMO_CHANCE";

/// Path for the persisted notification settings file.
pub const ENV_SETTINGS_PATH: &str = "TASKPING_SETTINGS_PATH";
