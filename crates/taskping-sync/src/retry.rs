//! Retry controller for notification-source checks.
//!
//! Wraps a single fallible operation with bounded retries and exponential
//! backoff. Intermediate failures are logged, never surfaced; only an
//! exhausted sequence turns into exactly one user-visible sync-error
//! notification. Reused with identical semantics by the foreground polling
//! scheduler and the background sync worker.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use taskping_core::defaults::{RETRY_BASE_DELAY_SECS, RETRY_MAX_ATTEMPTS};
use taskping_core::{NotificationEvent, Presenter, Result};

/// Retry bounds and backoff base.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts for one operation.
    pub max_attempts: u32,
    /// First backoff delay; attempt `i` (zero-based) waits `base * 2^i`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            base_delay: Duration::from_secs(RETRY_BASE_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Set the maximum attempt count (minimum 1).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Backoff before retrying after failed attempt `attempt` (zero-based).
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Retry phases, modeled explicitly rather than as a counter-and-branch loop.
#[derive(Debug, PartialEq, Eq)]
enum RetryPhase {
    /// About to run attempt `attempt` (zero-based).
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed; waiting before the next one.
    BackingOff { attempt: u32 },
    /// All attempts failed.
    Exhausted,
}

/// Run `op` under `policy`, presenting a single sync-error notification
/// through `presenter` if every attempt fails. Returns whether the operation
/// eventually succeeded.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    presenter: &dyn Presenter,
    op: F,
) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut phase = RetryPhase::Attempting { attempt: 0 };

    loop {
        match phase {
            RetryPhase::Attempting { attempt } => match op().await {
                Ok(()) => {
                    debug!(attempt, "check succeeded");
                    return true;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "check attempt failed");
                    phase = if attempt + 1 < policy.max_attempts {
                        RetryPhase::BackingOff { attempt }
                    } else {
                        RetryPhase::Exhausted
                    };
                }
            },
            RetryPhase::BackingOff { attempt } => {
                let delay = policy.backoff(attempt);
                debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
                sleep(delay).await;
                phase = RetryPhase::Attempting {
                    attempt: attempt + 1,
                };
            }
            RetryPhase::Exhausted => {
                warn!(
                    max_attempts = policy.max_attempts,
                    "check retries exhausted, surfacing sync error"
                );
                presenter.present(NotificationEvent::sync_error());
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingPresenter;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use taskping_core::{Error, NotificationCategory};
    use tokio::time::Instant;

    fn failing_op(
        calls: Arc<AtomicU32>,
        succeed_on: Option<u32>,
    ) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        move || {
            let calls = calls.clone();
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                match succeed_on {
                    Some(k) if n + 1 >= k => Ok(()),
                    _ => Err(Error::Request("connection refused".to_string())),
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_source_attempts_exactly_n_times() {
        let calls = Arc::new(AtomicU32::new(0));
        let presenter = RecordingPresenter::new();
        let policy = RetryPolicy::default();

        let ok = run_with_retry(&policy, &presenter, failing_op(calls.clone(), None)).await;

        assert!(!ok);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let errors = presenter.events_of(NotificationCategory::SyncError);
        assert_eq!(errors.len(), 1, "exactly one sync-error presentation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_double_each_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let presenter = RecordingPresenter::new();
        let policy = RetryPolicy::default();

        let start = Instant::now();
        run_with_retry(&policy, &presenter, failing_op(calls, None)).await;

        // 1s after attempt 0, 2s after attempt 1, no wait after the last
        assert_eq!(start.elapsed().as_secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_is_silent() {
        let calls = Arc::new(AtomicU32::new(0));
        let presenter = RecordingPresenter::new();
        let policy = RetryPolicy::default();

        let ok = run_with_retry(&policy, &presenter, failing_op(calls.clone(), Some(1))).await;

        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(presenter.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_k_attempts_never_surfaces_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let presenter = RecordingPresenter::new();
        let policy = RetryPolicy::default();

        let start = Instant::now();
        let ok = run_with_retry(&policy, &presenter, failing_op(calls.clone(), Some(2))).await;

        assert!(ok);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(presenter.events_of(NotificationCategory::SyncError).is_empty());
        // Only the first backoff elapsed
        assert_eq!(start.elapsed().as_secs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_attempt_bound() {
        let calls = Arc::new(AtomicU32::new(0));
        let presenter = RecordingPresenter::new();
        let policy = RetryPolicy::default().with_max_attempts(5);

        let start = Instant::now();
        run_with_retry(&policy, &presenter, failing_op(calls.clone(), None)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // 1 + 2 + 4 + 8
        assert_eq!(start.elapsed().as_secs(), 15);
        assert_eq!(presenter.events_of(NotificationCategory::SyncError).len(), 1);
    }

    #[test]
    fn test_max_attempts_floor_is_one() {
        let policy = RetryPolicy::default().with_max_attempts(0);
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn test_backoff_progression() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }
}
