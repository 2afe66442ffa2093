//! Delivery presenter: the notification surface of the pipeline.
//!
//! Presented notifications are broadcast as [`DeliveryEvent`] envelopes on a
//! [`DeliveryHub`]; downstream consumers (system tray bridge, UI, tests)
//! subscribe independently. Presentation is gated on platform capability and
//! user permission, and degrades to a silent no-op when either is missing —
//! callers never pre-check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use std::sync::Arc;

use taskping_core::defaults::AUTO_DISMISS_SECS;
use taskping_core::{Capabilities, NotificationEvent, PermissionState, Presenter, SettingsStore};

/// Where a presentation originated. Foreground-presented notifications
/// auto-dismiss after a fixed window unless their category pins; background
/// presentations persist until user-dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOrigin {
    Foreground,
    Background,
}

impl DeliveryOrigin {
    fn as_str(&self) -> &'static str {
        match self {
            DeliveryOrigin::Foreground => "foreground",
            DeliveryOrigin::Background => "background",
        }
    }
}

/// Event emitted on the delivery bus.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum DeliveryEvent {
    /// A notification was surfaced.
    Presented {
        event_id: Uuid,
        presented_at: DateTime<Utc>,
        origin: &'static str,
        event: NotificationEvent,
    },
    /// A foreground notification's auto-dismiss window elapsed.
    Expired { tag: String },
    /// One-time advisory that the user has denied notification permission.
    PermissionAdvisory { message: String },
}

/// Broadcast bus distributing delivery events to multiple consumers.
///
/// Slow receivers that fall behind receive a `Lagged` error and miss events;
/// freshness matters more than completeness for a notification surface.
#[derive(Clone)]
pub struct DeliveryHub {
    tx: broadcast::Sender<DeliveryEvent>,
}

impl DeliveryHub {
    /// Create a hub with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers. Silently dropped with none active.
    pub fn emit(&self, event: DeliveryEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to delivery events.
    pub fn subscribe(&self) -> broadcast::Receiver<DeliveryEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// The concrete presenter wired into schedulers, planners, and workers.
pub struct DeliveryPresenter {
    hub: DeliveryHub,
    origin: DeliveryOrigin,
    capabilities: Capabilities,
    permission: RwLock<PermissionState>,
    denied_advisory_sent: AtomicBool,
    settings: Option<Arc<SettingsStore>>,
}

impl DeliveryPresenter {
    pub fn new(
        hub: DeliveryHub,
        origin: DeliveryOrigin,
        capabilities: Capabilities,
        permission: PermissionState,
    ) -> Self {
        Self {
            hub,
            origin,
            capabilities,
            permission: RwLock::new(permission),
            denied_advisory_sent: AtomicBool::new(false),
            settings: None,
        }
    }

    /// Presenter with full capability and granted permission.
    pub fn granted(hub: DeliveryHub, origin: DeliveryOrigin) -> Self {
        Self::new(hub, origin, Capabilities::default(), PermissionState::Granted)
    }

    /// Gate presentations on the master enable toggle of a settings store,
    /// re-read at presentation time.
    pub fn with_settings(mut self, settings: Arc<SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Current permission state.
    pub fn permission(&self) -> PermissionState {
        *self.permission.read().expect("permission lock poisoned")
    }

    /// Record the outcome of an explicit permission request. Re-granting
    /// re-arms the one-time denied advisory.
    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.write().expect("permission lock poisoned") = permission;
        if permission == PermissionState::Granted {
            self.denied_advisory_sent.store(false, Ordering::SeqCst);
        }
    }
}

impl Presenter for DeliveryPresenter {
    fn present(&self, event: NotificationEvent) {
        if !self.capabilities.notifications_supported {
            debug!(tag = %event.tag, "notifications unsupported, dropping event");
            return;
        }

        if let Some(settings) = &self.settings {
            if !settings.get().enabled {
                debug!(tag = %event.tag, "notifications disabled in settings, dropping event");
                return;
            }
        }

        match self.permission() {
            PermissionState::Granted => {}
            PermissionState::Denied => {
                // Surface the denial once, then stay silent until an explicit
                // re-request changes the permission.
                if !self.denied_advisory_sent.swap(true, Ordering::SeqCst) {
                    warn!("notification permission denied, suppressing presentations");
                    self.hub.emit(DeliveryEvent::PermissionAdvisory {
                        message: "Notifications are disabled. Enable them in your browser settings."
                            .to_string(),
                    });
                }
                return;
            }
            PermissionState::Default => {
                debug!(tag = %event.tag, "notification permission not granted yet, dropping event");
                return;
            }
        }

        let tag = event.tag.clone();
        let auto_dismiss =
            self.origin == DeliveryOrigin::Foreground && !event.require_interaction;

        debug!(
            tag = %tag,
            category = ?event.category,
            origin = self.origin.as_str(),
            "presenting notification"
        );

        self.hub.emit(DeliveryEvent::Presented {
            event_id: Uuid::now_v7(),
            presented_at: Utc::now(),
            origin: self.origin.as_str(),
            event,
        });

        if auto_dismiss {
            let hub = self.hub.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(AUTO_DISMISS_SECS)).await;
                hub.emit(DeliveryEvent::Expired { tag });
            });
        }
    }
}
