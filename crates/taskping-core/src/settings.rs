//! Persisted notification settings store.
//!
//! Settings are owned exclusively by this store; the pipeline treats them as
//! read-only input, re-read whenever the store's change notification fires.
//! Persistence is a single JSON file; a missing file yields defaults.

use std::path::PathBuf;
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::NotificationSettings;

/// Partial settings update. `None` fields leave the current value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    pub task_reminders: Option<bool>,
    pub daily_summary: Option<bool>,
    pub overdue_alerts: Option<bool>,
    pub reminder_time: Option<String>,
}

/// Read/write store for [`NotificationSettings`] with JSON-file persistence
/// and broadcast change notifications.
///
/// Validation is structural only: any string is accepted for
/// `reminder_time` — an unparseable value means the daily summary never
/// fires, which is the documented permissive behavior.
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<NotificationSettings>,
    tx: broadcast::Sender<NotificationSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist. A present-but-malformed file is an error rather than a
    /// silent reset.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                NotificationSettings::default()
            }
            Err(e) => return Err(e.into()),
        };

        let (tx, _) = broadcast::channel(16);
        Ok(Self {
            path: Some(path),
            current: RwLock::new(settings),
            tx,
        })
    }

    /// Store without persistence, starting from defaults.
    pub fn in_memory() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            path: None,
            current: RwLock::new(NotificationSettings::default()),
            tx,
        }
    }

    /// Current settings snapshot.
    pub fn get(&self) -> NotificationSettings {
        self.current.read().expect("settings lock poisoned").clone()
    }

    /// Merge a partial update into the current settings, persist, and notify
    /// watchers. Returns the merged value.
    pub fn update(&self, update: SettingsUpdate) -> Result<NotificationSettings> {
        let merged = {
            let mut current = self.current.write().expect("settings lock poisoned");
            if let Some(enabled) = update.enabled {
                current.enabled = enabled;
            }
            if let Some(task_reminders) = update.task_reminders {
                current.task_reminders = task_reminders;
            }
            if let Some(daily_summary) = update.daily_summary {
                current.daily_summary = daily_summary;
            }
            if let Some(overdue_alerts) = update.overdue_alerts {
                current.overdue_alerts = overdue_alerts;
            }
            if let Some(reminder_time) = update.reminder_time {
                current.reminder_time = reminder_time;
            }
            current.clone()
        };

        if let Some(ref path) = self.path {
            std::fs::write(path, serde_json::to_string_pretty(&merged)?)?;
        }

        info!(enabled = merged.enabled, "notification settings updated");
        let _ = self.tx.send(merged.clone());
        Ok(merged)
    }

    /// Subscribe to settings changes. Each subscriber gets its own stream.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationSettings> {
        self.tx.subscribe()
    }
}
