//! In-memory notification queue.
//!
//! Implements the injected [`NotificationStore`] seam so the notify endpoint
//! carries no process-global state and tests get a fresh queue per case.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskping_core::{NotificationCheckResult, NotificationStore, Result};

/// FIFO queue of enqueued notification payloads.
pub struct InMemoryNotificationStore {
    queue: Mutex<VecDeque<NotificationCheckResult>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of queued payloads.
    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn enqueue(&self, payload: NotificationCheckResult) -> Result<()> {
        self.queue.lock().await.push_back(payload);
        Ok(())
    }

    async fn dequeue_one(&self) -> Result<Option<NotificationCheckResult>> {
        Ok(self.queue.lock().await.pop_front())
    }
}
