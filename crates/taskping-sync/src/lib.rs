//! # taskping-sync
//!
//! The background notification delivery pipeline: delivery presenter, retry
//! controller, staggered emitter, polling scheduler, task-derived planner,
//! and the background sync worker.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use taskping_core::SettingsStore;
//! use taskping_sync::{
//!     DeliveryHub, DeliveryOrigin, DeliveryPresenter, HttpNotificationSource,
//!     PollingScheduler, SchedulerConfig,
//! };
//!
//! let hub = DeliveryHub::new(256);
//! let presenter = Arc::new(DeliveryPresenter::granted(hub.clone(), DeliveryOrigin::Foreground));
//! let source = Arc::new(HttpNotificationSource::new("http://localhost:3000")?);
//! let settings = Arc::new(SettingsStore::in_memory());
//!
//! let scheduler = PollingScheduler::new(source, presenter, settings, SchedulerConfig::default());
//! scheduler.set_enabled(true);
//!
//! // Listen for presented notifications
//! let mut deliveries = hub.subscribe();
//! while let Ok(event) = deliveries.recv().await {
//!     println!("delivered: {:?}", event);
//! }
//! ```

pub mod check;
pub mod delivery;
pub mod mock;
pub mod planner;
pub mod retry;
pub mod scheduler;
pub mod source;
pub mod stagger;
pub mod worker;

// Re-export core types
pub use taskping_core::*;

pub use check::{check_once, checked_poll};
pub use delivery::{DeliveryEvent, DeliveryHub, DeliveryOrigin, DeliveryPresenter};
pub use mock::{MockNotificationSource, RecordingPresenter, ScriptedOutcome};
pub use planner::NotificationPlanner;
pub use retry::{run_with_retry, RetryPolicy};
pub use scheduler::{PollingScheduler, SchedulerConfig, SchedulerStatus};
pub use source::HttpNotificationSource;
pub use stagger::emit_staggered;
pub use worker::{SyncSignal, SyncWorker, SyncWorkerConfig, WorkerEvent, WorkerHandle};
