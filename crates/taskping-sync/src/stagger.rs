//! Staggered multi-notification emission.
//!
//! When one check or planner run yields several task-associated events,
//! presenting them simultaneously buries the user in a burst. The emitter
//! spaces them out by a fixed per-item delay instead, preserving input order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use taskping_core::{NotificationEvent, Presenter};

/// Present `events[i]` after `i * delay`, in input order, without delaying
/// the caller. Returns the emitting task's handle; dropping it does not
/// cancel emission.
pub fn emit_staggered(
    presenter: Arc<dyn Presenter>,
    events: Vec<NotificationEvent>,
    delay: Duration,
) -> JoinHandle<()> {
    debug!(event_count = events.len(), delay_ms = delay.as_millis() as u64, "staggering notifications");
    tokio::spawn(async move {
        for (i, event) in events.into_iter().enumerate() {
            if i > 0 {
                sleep(delay).await;
            }
            presenter.present(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingPresenter;
    use taskping_core::SourceTask;
    use tokio::time::Instant;

    fn task(id: &str, kind: &str) -> SourceTask {
        SourceTask {
            id: id.to_string(),
            title: format!("Task {id}"),
            kind: kind.to_string(),
            priority: taskping_core::Priority::Medium,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_arrive_one_second_apart() {
        let presenter = Arc::new(RecordingPresenter::new());
        let events = vec![
            NotificationEvent::task_event(&task("a", "reminder")),
            NotificationEvent::task_event(&task("b", "overdue")),
            NotificationEvent::task_event(&task("c", "new")),
        ];

        let start = Instant::now();
        let handle = emit_staggered(presenter.clone(), events, Duration::from_millis(1000));
        handle.await.unwrap();

        let timed = presenter.timed_events();
        assert_eq!(timed.len(), 3);
        assert_eq!((timed[0].1 - start).as_millis(), 0);
        assert_eq!((timed[1].1 - start).as_millis(), 1000);
        assert_eq!((timed[2].1 - start).as_millis(), 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_follows_input_order() {
        let presenter = Arc::new(RecordingPresenter::new());
        let events = vec![
            NotificationEvent::task_event(&task("first", "reminder")),
            NotificationEvent::task_event(&task("second", "unknown-type")),
            NotificationEvent::task_event(&task("third", "new")),
        ];

        emit_staggered(presenter.clone(), events, Duration::from_millis(250))
            .await
            .unwrap();

        let seen: Vec<String> = presenter
            .events()
            .into_iter()
            .map(|e| e.task_id.unwrap())
            .collect();
        assert_eq!(seen, vec!["first", "second", "third"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_is_not_delayed() {
        let presenter = Arc::new(RecordingPresenter::new());
        let events = vec![
            NotificationEvent::task_event(&task("a", "reminder")),
            NotificationEvent::task_event(&task("b", "reminder")),
        ];

        let start = Instant::now();
        let _handle = emit_staggered(presenter, events, Duration::from_secs(10));
        // The spawn returns immediately; no time has passed for the caller
        assert_eq!(start.elapsed().as_millis(), 0);
    }

    #[tokio::test]
    async fn test_empty_event_list_is_fine() {
        let presenter = Arc::new(RecordingPresenter::new());
        emit_staggered(presenter.clone(), Vec::new(), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(presenter.events().is_empty());
    }
}
