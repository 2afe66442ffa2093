//! Background sync worker.
//!
//! The headless counterpart of the foreground scheduler: it reacts to
//! platform signals (background sync, periodic sync, push delivery, manual
//! check requests) instead of owning a timer, and presents through a
//! background-origin presenter so pinned categories persist until dismissed.
//! Checks run through the same retry controller as the foreground path.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use taskping_core::{Error, NotificationEvent, NotificationSource, Presenter, Result};

use crate::check::checked_poll;
use crate::retry::RetryPolicy;

/// Signal delivered to the worker.
#[derive(Debug, Clone)]
pub enum SyncSignal {
    /// Background-sync fired (connectivity restored).
    Sync,
    /// Periodic background check fired.
    PeriodicSync,
    /// Manual check request.
    CheckNow,
    /// Push delivery with an optional payload body and dedup tag.
    Push {
        payload: Option<String>,
        tag: Option<String>,
    },
}

impl SyncSignal {
    fn name(&self) -> &'static str {
        match self {
            SyncSignal::Sync => "sync",
            SyncSignal::PeriodicSync => "periodic-sync",
            SyncSignal::CheckNow => "check-now",
            SyncSignal::Push { .. } => "push",
        }
    }
}

/// Event emitted by the sync worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Worker started.
    WorkerStarted,
    /// Worker stopped.
    WorkerStopped,
    /// A source check began.
    CheckStarted { signal: &'static str },
    /// A source check finished (after retries).
    CheckCompleted { succeeded: bool },
    /// A push payload was presented.
    PushPresented,
}

/// Configuration for the sync worker.
#[derive(Debug, Clone)]
pub struct SyncWorkerConfig {
    /// Whether to process signals at all.
    pub enabled: bool,
    /// Retry bounds for each check.
    pub retry: RetryPolicy,
    /// Signal channel buffer size.
    pub signal_buffer: usize,
}

impl Default for SyncWorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retry: RetryPolicy::default(),
            signal_buffer: 16,
        }
    }
}

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    signal_tx: mpsc::Sender<SyncSignal>,
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<WorkerEvent>,
}

impl WorkerHandle {
    /// Deliver a signal to the worker.
    pub async fn signal(&self, signal: SyncSignal) -> Result<()> {
        self.signal_tx
            .send(signal)
            .await
            .map_err(|_| Error::Internal("sync worker is not running".into()))
    }

    /// Signal the worker to shut down gracefully.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| Error::Internal("sync worker is not running".into()))
    }

    /// Get a receiver for worker events.
    pub fn events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.event_rx.resubscribe()
    }
}

/// Signal-driven background worker.
pub struct SyncWorker {
    source: Arc<dyn NotificationSource>,
    presenter: Arc<dyn Presenter>,
    config: SyncWorkerConfig,
    event_tx: broadcast::Sender<WorkerEvent>,
}

impl SyncWorker {
    pub fn new(
        source: Arc<dyn NotificationSource>,
        presenter: Arc<dyn Presenter>,
        config: SyncWorkerConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(taskping_core::defaults::DELIVERY_BUS_CAPACITY);
        Self {
            source,
            presenter,
            config,
            event_tx,
        }
    }

    /// Start the worker and return a handle for control.
    pub fn start(self) -> WorkerHandle {
        let (signal_tx, signal_rx) = mpsc::channel(self.config.signal_buffer);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        tokio::spawn(async move {
            self.run(signal_rx, shutdown_rx).await;
        });

        WorkerHandle {
            signal_tx,
            shutdown_tx,
            event_rx,
        }
    }

    async fn run(
        &self,
        mut signal_rx: mpsc::Receiver<SyncSignal>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        if !self.config.enabled {
            info!("sync worker is disabled, not starting");
            return;
        }

        info!("sync worker started");
        let _ = self.event_tx.send(WorkerEvent::WorkerStarted);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("sync worker received shutdown signal");
                    break;
                }
                signal = signal_rx.recv() => {
                    match signal {
                        Some(signal) => self.handle_signal(signal).await,
                        None => break,
                    }
                }
            }
        }

        let _ = self.event_tx.send(WorkerEvent::WorkerStopped);
        info!("sync worker stopped");
    }

    async fn handle_signal(&self, signal: SyncSignal) {
        debug!(signal = signal.name(), "handling sync signal");
        match signal {
            SyncSignal::Sync | SyncSignal::PeriodicSync | SyncSignal::CheckNow => {
                let _ = self.event_tx.send(WorkerEvent::CheckStarted {
                    signal: signal.name(),
                });
                let succeeded =
                    checked_poll(&self.source, &self.presenter, &self.config.retry).await;
                let _ = self
                    .event_tx
                    .send(WorkerEvent::CheckCompleted { succeeded });
            }
            SyncSignal::Push { payload, tag } => {
                self.presenter
                    .present(NotificationEvent::push_message(payload, tag));
                let _ = self.event_tx.send(WorkerEvent::PushPresented);
            }
        }
    }
}
