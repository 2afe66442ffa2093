//! Mock notification source and recording presenter for deterministic
//! testing.
//!
//! ## Usage
//!
//! ```ignore
//! use taskping_sync::mock::{MockNotificationSource, ScriptedOutcome};
//!
//! let source = MockNotificationSource::new()
//!     .with_outcome(ScriptedOutcome::failure("timeout"))
//!     .with_outcome(ScriptedOutcome::empty());
//!
//! // First check fails, second succeeds with nothing pending,
//! // further checks keep returning empty results.
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use taskping_core::{
    Error, NotificationCategory, NotificationCheckResult, NotificationEvent, NotificationSource,
    Presenter, Result, SourceTask,
};

/// One scripted source response.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Success(NotificationCheckResult),
    Failure(String),
}

impl ScriptedOutcome {
    /// A successful check with nothing pending.
    pub fn empty() -> Self {
        ScriptedOutcome::Success(NotificationCheckResult::empty())
    }

    /// A successful check with a message and task items.
    pub fn pending(message: &str, tasks: Vec<SourceTask>) -> Self {
        ScriptedOutcome::Success(NotificationCheckResult::pending(
            Some(message.to_string()),
            tasks,
        ))
    }

    /// A failed check.
    pub fn failure(message: &str) -> Self {
        ScriptedOutcome::Failure(message.to_string())
    }
}

/// Notification source returning scripted outcomes in order.
///
/// Once the script is drained, further checks return empty results, so a
/// polling loop under test can keep ticking.
pub struct MockNotificationSource {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    calls: AtomicUsize,
}

impl MockNotificationSource {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append an outcome to the script.
    pub fn with_outcome(self, outcome: ScriptedOutcome) -> Self {
        self.script.lock().expect("script lock poisoned").push_back(outcome);
        self
    }

    /// Append `n` copies of an outcome.
    pub fn with_outcomes(mut self, outcome: ScriptedOutcome, n: usize) -> Self {
        for _ in 0..n {
            self = self.with_outcome(outcome.clone());
        }
        self
    }

    /// Number of checks performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockNotificationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSource for MockNotificationSource {
    async fn check_pending(&self) -> Result<NotificationCheckResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().expect("script lock poisoned").pop_front();
        match next {
            Some(ScriptedOutcome::Success(result)) => Ok(result),
            Some(ScriptedOutcome::Failure(message)) => Err(Error::Source(message)),
            None => Ok(NotificationCheckResult::empty()),
        }
    }
}

/// Presenter that records every event with the instant it was presented.
///
/// Instants come from `tokio::time::Instant`, so paused-clock tests can make
/// exact timing assertions.
pub struct RecordingPresenter {
    events: Mutex<Vec<(NotificationEvent, tokio::time::Instant)>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// All recorded events in presentation order.
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .expect("events lock poisoned")
            .iter()
            .map(|(e, _)| e.clone())
            .collect()
    }

    /// Recorded events of one category.
    pub fn events_of(&self, category: NotificationCategory) -> Vec<NotificationEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Recorded events with their presentation instants.
    pub fn timed_events(&self) -> Vec<(NotificationEvent, tokio::time::Instant)> {
        self.events.lock().expect("events lock poisoned").clone()
    }
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, event: NotificationEvent) {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push((event, tokio::time::Instant::now()));
    }
}
