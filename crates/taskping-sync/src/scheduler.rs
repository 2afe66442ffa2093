//! Foreground polling scheduler.
//!
//! Owns the recurring timer that checks the notification source, and the
//! lifecycle state machine gating it on the enabled flag, page visibility,
//! and network connectivity. All three triggers funnel through one
//! reconciliation step — desired state is computed from the current
//! `{enabled, visible, online}` triple and compared against the actual
//! polling state — so convergence does not depend on trigger order and a
//! late "online" event can never override a user-initiated disable.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use taskping_core::defaults::{
    BACKGROUND_SYNC_TAG, ENV_POLL_ENABLED, ENV_POLL_INTERVAL_MS, POLL_INTERVAL_MS,
};
use taskping_core::{
    NotificationSource, PollingState, Presenter, SettingsStore, SyncRegistration,
};

use crate::check::checked_poll;
use crate::retry::RetryPolicy;

/// Configuration for the polling scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Whether polling starts enabled.
    pub enabled: bool,
    /// Retry bounds for each check.
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            enabled: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `TASKPING_POLL_ENABLED` | `true` | Enable/disable polling |
    /// | `TASKPING_POLL_INTERVAL_MS` | `60000` | Polling interval |
    pub fn from_env() -> Self {
        let enabled = std::env::var(ENV_POLL_ENABLED)
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let poll_interval_ms = std::env::var(ENV_POLL_INTERVAL_MS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(POLL_INTERVAL_MS);

        Self {
            poll_interval_ms,
            enabled,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the polling interval.
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Enable or disable polling at startup.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Observability snapshot of the scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    pub polling: PollingState,
    pub enabled: bool,
    pub visible: bool,
    pub online: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct LifecycleState {
    polling: PollingState,
    timer: Option<JoinHandle<()>>,
    enabled: bool,
    visible: bool,
    online: bool,
    last_check: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

struct Inner {
    source: Arc<dyn NotificationSource>,
    presenter: Arc<dyn Presenter>,
    settings: Arc<SettingsStore>,
    registration: Option<Arc<dyn SyncRegistration>>,
    poll_interval: Duration,
    retry: RetryPolicy,
    state: Mutex<LifecycleState>,
}

/// Polling scheduler with a `{Stopped, Running}` state machine.
///
/// At most one recurring timer exists per instance: every transition into
/// the running state cancels any previous timer before arming a new one.
/// `stop()` cancels the pending timer but never an in-flight check — a late
/// presentation is harmless.
pub struct PollingScheduler {
    inner: Arc<Inner>,
}

impl PollingScheduler {
    /// Create a scheduler. It is constructed stopped regardless of
    /// `config.enabled`; call [`start`](Self::start) (or fire any trigger)
    /// to reconcile into the desired state.
    pub fn new(
        source: Arc<dyn NotificationSource>,
        presenter: Arc<dyn Presenter>,
        settings: Arc<SettingsStore>,
        config: SchedulerConfig,
    ) -> Self {
        Self::with_registration(source, presenter, settings, None, config)
    }

    pub fn with_registration(
        source: Arc<dyn NotificationSource>,
        presenter: Arc<dyn Presenter>,
        settings: Arc<SettingsStore>,
        registration: Option<Arc<dyn SyncRegistration>>,
        config: SchedulerConfig,
    ) -> Self {
        let inner = Arc::new(Inner {
            source,
            presenter,
            settings,
            registration,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            retry: config.retry,
            state: Mutex::new(LifecycleState {
                polling: PollingState::Stopped,
                timer: None,
                enabled: config.enabled,
                visible: true,
                online: true,
                last_check: None,
                last_error: None,
            }),
        });
        Self { inner }
    }

    /// Enable polling. Equivalent to `set_enabled(true)`.
    pub fn start(&self) {
        self.set_enabled(true);
    }

    /// Disable polling. Idempotent. Equivalent to `set_enabled(false)`.
    pub fn stop(&self) {
        self.set_enabled(false);
    }

    /// User-initiated enable/disable trigger.
    pub fn set_enabled(&self, enabled: bool) {
        self.reconcile(|st| st.enabled = enabled);
    }

    /// Page/application visibility trigger. Hidden forces polling off
    /// regardless of the enabled flag.
    pub fn set_visible(&self, visible: bool) {
        self.reconcile(|st| st.visible = visible);
    }

    /// Network connectivity trigger. Offline forces polling off; coming back
    /// online resumes only if still enabled and visible.
    pub fn set_online(&self, online: bool) {
        self.reconcile(|st| st.online = online);
    }

    /// Current polling state.
    pub fn polling_state(&self) -> PollingState {
        self.inner.state.lock().expect("state lock poisoned").polling
    }

    /// Observability snapshot.
    pub fn status(&self) -> SchedulerStatus {
        let st = self.inner.state.lock().expect("state lock poisoned");
        SchedulerStatus {
            polling: st.polling,
            enabled: st.enabled,
            visible: st.visible,
            online: st.online,
            last_check: st.last_check,
            last_error: st.last_error.clone(),
        }
    }

    /// Apply a trigger mutation, then converge the polling state toward the
    /// desired state derived from `{enabled, visible, online}`.
    fn reconcile(&self, mutate: impl FnOnce(&mut LifecycleState)) {
        let mut st = self.inner.state.lock().expect("state lock poisoned");
        mutate(&mut st);

        let desired = if st.enabled && st.visible && st.online {
            PollingState::Running
        } else {
            PollingState::Stopped
        };

        if desired == st.polling {
            return;
        }

        debug!(
            polling_state = ?st.polling,
            desired_state = ?desired,
            enabled = st.enabled,
            visible = st.visible,
            online = st.online,
            "scheduler state transition"
        );

        match desired {
            PollingState::Running => Inner::enter_running(&self.inner, &mut st),
            PollingState::Stopped => Inner::enter_stopped(&mut st),
        }
    }
}

impl Inner {
    /// Transition into running: cancel any existing timer, perform an
    /// immediate check, and arm the recurring timer.
    fn enter_running(inner: &Arc<Inner>, st: &mut LifecycleState) {
        if let Some(timer) = st.timer.take() {
            timer.abort();
        }

        st.polling = PollingState::Running;
        st.timer = Some(Self::spawn_timer(inner));
        info!(
            poll_interval_ms = inner.poll_interval.as_millis() as u64,
            "polling started"
        );

        // Best-effort background sync registration; failure never affects
        // the state machine.
        if let Some(registration) = inner.registration.clone() {
            tokio::spawn(async move {
                match registration.register(BACKGROUND_SYNC_TAG).await {
                    Ok(()) => debug!(tag = BACKGROUND_SYNC_TAG, "background sync registered"),
                    Err(e) => warn!(error = %e, "background sync registration failed"),
                }
            });
        }
    }

    /// Transition into stopped: cancel the pending timer. In-flight checks
    /// run as detached tasks and are allowed to complete.
    fn enter_stopped(st: &mut LifecycleState) {
        if let Some(timer) = st.timer.take() {
            timer.abort();
        }
        st.polling = PollingState::Stopped;
        info!("polling stopped");
    }

    fn spawn_timer(inner: &Arc<Inner>) -> JoinHandle<()> {
        let inner = inner.clone();
        tokio::spawn(async move {
            inner.spawn_check();
            loop {
                sleep(inner.poll_interval).await;
                inner.spawn_check();
            }
        })
    }

    /// Run one check as a detached task so cancelling the timer never
    /// cancels a check mid-flight.
    fn spawn_check(self: &Arc<Self>) {
        let inner = self.clone();
        tokio::spawn(async move {
            inner.run_check().await;
        });
    }

    async fn run_check(&self) {
        // Master toggle, re-read at check time through the settings store
        if !self.settings.get().enabled {
            debug!("notifications disabled in settings, skipping check");
            return;
        }

        let ok = checked_poll(&self.source, &self.presenter, &self.retry).await;

        let mut st = self.state.lock().expect("state lock poisoned");
        st.last_check = Some(Utc::now());
        st.last_error = if ok {
            None
        } else {
            Some(format!(
                "check failed after {} attempts",
                self.retry.max_attempts
            ))
        };
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        // The timer task owns an Arc<Inner>; abort it so a dropped scheduler
        // does not keep polling forever.
        if let Ok(mut st) = self.inner.state.lock() {
            if let Some(timer) = st.timer.take() {
                timer.abort();
            }
        }
    }
}
