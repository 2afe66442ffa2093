//! The single "check the source and present results" operation.
//!
//! Both polling paths — the foreground scheduler and the background worker —
//! run this same operation, optionally wrapped in the retry controller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use taskping_core::defaults::STAGGER_DELAY_MS;
use taskping_core::{NotificationCheckResult, NotificationEvent, NotificationSource, Presenter, Result};

use crate::retry::{run_with_retry, RetryPolicy};
use crate::stagger::emit_staggered;

/// Ask the source once and present whatever it reports: one aggregate
/// sync-result notification, then the task items staggered a second apart.
pub async fn check_once(
    source: &dyn NotificationSource,
    presenter: &Arc<dyn Presenter>,
) -> Result<NotificationCheckResult> {
    let result = source.check_pending().await?;

    if !result.has_notifications {
        debug!("nothing pending at source");
        return Ok(result);
    }

    info!(
        task_count = result.tasks.as_ref().map(Vec::len).unwrap_or(0),
        "source reported pending notifications"
    );
    presenter.present(NotificationEvent::sync_result(result.message.clone()));

    if let Some(tasks) = result.tasks.as_deref() {
        if !tasks.is_empty() {
            let events = tasks.iter().map(NotificationEvent::task_event).collect();
            emit_staggered(
                presenter.clone(),
                events,
                Duration::from_millis(STAGGER_DELAY_MS),
            );
        }
    }

    Ok(result)
}

/// Retry-wrapped [`check_once`]: bounded attempts, exponential backoff, and a
/// single sync-error presentation on exhaustion. Returns whether a check
/// eventually succeeded.
pub async fn checked_poll(
    source: &Arc<dyn NotificationSource>,
    presenter: &Arc<dyn Presenter>,
    policy: &RetryPolicy,
) -> bool {
    run_with_retry(policy, presenter.as_ref(), || {
        let source = source.clone();
        let presenter = presenter.clone();
        async move { check_once(source.as_ref(), &presenter).await.map(|_| ()) }
    })
    .await
}
