//! Core data models for taskping.
//!
//! These types are shared across all taskping crates and represent the
//! domain entities of the notification pipeline: tasks (read-only input),
//! notification events (transient output), user settings, and the wire
//! shapes of the notification source.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// TASK TYPES
// =============================================================================

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A user task, as persisted by the task UI.
///
/// The pipeline only ever reads tasks; creation, mutation, and deletion
/// happen outside this system. The planner observes a snapshot on every
/// task-list change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

// =============================================================================
// NOTIFICATION EVENTS
// =============================================================================

/// Notification category.
///
/// The category decides the human title label, whether the notification pins
/// until user-dismissed, and the fixed dedup tag for aggregate events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationCategory {
    Reminder,
    Overdue,
    New,
    DailySummary,
    SyncResult,
    SyncError,
    Test,
}

impl NotificationCategory {
    /// Human label used as the notification title for per-task events.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationCategory::Reminder => "Reminder",
            NotificationCategory::Overdue => "Overdue",
            NotificationCategory::New => "New task",
            NotificationCategory::DailySummary => "Daily summary",
            NotificationCategory::SyncResult => "Task Manager",
            NotificationCategory::SyncError => "Task Manager",
            NotificationCategory::Test => "Test",
        }
    }

    /// Whether notifications of this category persist until user-dismissed
    /// when presented through a background path. Overdue and sync alerts pin;
    /// routine reminders do not.
    pub fn require_interaction(&self) -> bool {
        matches!(
            self,
            NotificationCategory::Overdue
                | NotificationCategory::SyncResult
                | NotificationCategory::SyncError
                | NotificationCategory::Test
        )
    }

    /// Fixed dedup tag for aggregate events of this category, so a re-run
    /// supersedes rather than stacks. Per-task events derive their own tag
    /// from the task id instead.
    pub fn aggregate_tag(&self) -> &'static str {
        match self {
            NotificationCategory::Reminder => "upcoming-tasks",
            NotificationCategory::Overdue => "overdue-tasks",
            NotificationCategory::New => "new-tasks",
            NotificationCategory::DailySummary => "daily-summary",
            NotificationCategory::SyncResult => "background-sync",
            NotificationCategory::SyncError => "sync-error",
            NotificationCategory::Test => "test",
        }
    }

    /// Parse a source-supplied task type string. The source is external
    /// input and may supply any string; unknown values return `None`.
    pub fn from_source_type(kind: &str) -> Option<Self> {
        match kind {
            "reminder" => Some(NotificationCategory::Reminder),
            "overdue" => Some(NotificationCategory::Overdue),
            "new" => Some(NotificationCategory::New),
            _ => None,
        }
    }

    /// Title label for a source-supplied task type, falling back to a
    /// generic "Task" for unrecognized values.
    pub fn source_label(kind: &str) -> &'static str {
        Self::from_source_type(kind)
            .map(|c| c.label())
            .unwrap_or("Task")
    }
}

/// An action button attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    /// Action identifier reported back on click.
    #[serde(rename = "action")]
    pub id: String,
    /// Button label.
    #[serde(rename = "title")]
    pub label: String,
}

impl NotificationAction {
    pub fn view() -> Self {
        Self {
            id: "view".to_string(),
            label: "View tasks".to_string(),
        }
    }

    pub fn dismiss() -> Self {
        Self {
            id: "dismiss".to_string(),
            label: "Dismiss".to_string(),
        }
    }
}

/// A single notification to present.
///
/// Transient: constructed, presented, and discarded; never stored. The dedup
/// tag is derived deterministically from the category and (if present) the
/// task identifier, so repeated planner or poll runs supersede equivalent
/// prior notifications instead of stacking duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub category: NotificationCategory,
    pub title: String,
    pub body: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    pub require_interaction: bool,
}

impl NotificationEvent {
    /// Aggregate overdue alert ("you have N overdue tasks").
    pub fn overdue_summary(count: usize) -> Self {
        let category = NotificationCategory::Overdue;
        Self {
            category,
            title: "Overdue tasks!".to_string(),
            body: format!("You have {} overdue task(s)", count),
            tag: category.aggregate_tag().to_string(),
            task_id: None,
            actions: Vec::new(),
            require_interaction: category.require_interaction(),
        }
    }

    /// Aggregate due-soon reminder.
    pub fn upcoming_summary(count: usize) -> Self {
        let category = NotificationCategory::Reminder;
        Self {
            category,
            title: "Tasks due soon".to_string(),
            body: format!("{} task(s) due within 24 hours", count),
            tag: category.aggregate_tag().to_string(),
            task_id: None,
            actions: Vec::new(),
            require_interaction: category.require_interaction(),
        }
    }

    /// Daily summary of pending and completed work.
    pub fn daily_summary(pending: usize, completed_today: usize) -> Self {
        let category = NotificationCategory::DailySummary;
        Self {
            category,
            title: "Daily summary".to_string(),
            body: format!("{} pending, {} completed today", pending, completed_today),
            tag: category.aggregate_tag().to_string(),
            task_id: None,
            actions: Vec::new(),
            require_interaction: category.require_interaction(),
        }
    }

    /// Aggregate result of a successful notification-source check.
    pub fn sync_result(message: Option<String>) -> Self {
        let category = NotificationCategory::SyncResult;
        Self {
            category,
            title: "Task Manager".to_string(),
            body: message.unwrap_or_else(|| "You have new updates!".to_string()),
            tag: category.aggregate_tag().to_string(),
            task_id: None,
            actions: vec![NotificationAction::view(), NotificationAction::dismiss()],
            require_interaction: category.require_interaction(),
        }
    }

    /// The single user-visible event for an exhausted retry sequence.
    pub fn sync_error() -> Self {
        let category = NotificationCategory::SyncError;
        Self {
            category,
            title: "Task Manager".to_string(),
            body: "Could not check for new tasks. Check your connection.".to_string(),
            tag: category.aggregate_tag().to_string(),
            task_id: None,
            actions: Vec::new(),
            require_interaction: category.require_interaction(),
        }
    }

    /// Per-task event from a source-supplied task item. The title falls back
    /// to a generic "Task" label for unrecognized type strings; per-task
    /// events never pin regardless of category.
    pub fn task_event(task: &SourceTask) -> Self {
        Self {
            category: NotificationCategory::from_source_type(&task.kind)
                .unwrap_or(NotificationCategory::Reminder),
            title: NotificationCategory::source_label(&task.kind).to_string(),
            body: task.title.clone(),
            tag: format!("task-{}", task.id),
            task_id: Some(task.id.clone()),
            actions: Vec::new(),
            require_interaction: false,
        }
    }

    /// Mock push delivery: payload text or a default body.
    pub fn push_message(body: Option<String>, tag: Option<String>) -> Self {
        let category = NotificationCategory::Test;
        Self {
            category,
            title: "Task Manager".to_string(),
            body: body.unwrap_or_else(|| "New task available!".to_string()),
            tag: tag.unwrap_or_else(|| "default".to_string()),
            task_id: None,
            actions: vec![NotificationAction::view(), NotificationAction::dismiss()],
            require_interaction: category.require_interaction(),
        }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// User notification preferences.
///
/// Owned by the [`crate::SettingsStore`]; the pipeline treats the value as
/// read-only input. Validation is structural only: an out-of-range
/// `reminder_time` is accepted as-is and simply never fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Master enable; gates every presentation path.
    pub enabled: bool,
    /// Due-soon reminder toggle.
    pub task_reminders: bool,
    /// Daily summary toggle.
    pub daily_summary: bool,
    /// Overdue alert toggle.
    pub overdue_alerts: bool,
    /// Daily summary time of day, `HH:MM` 24h clock.
    pub reminder_time: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            task_reminders: true,
            daily_summary: true,
            overdue_alerts: true,
            reminder_time: crate::defaults::REMINDER_TIME.to_string(),
        }
    }
}

impl NotificationSettings {
    /// Parse `reminder_time` into a time of day. Returns `None` for values
    /// that do not name a real clock time; the daily summary then never
    /// fires, which is the documented permissive behavior.
    pub fn reminder_time_of_day(&self) -> Option<NaiveTime> {
        let (hours, minutes) = self.reminder_time.split_once(':')?;
        let hours: u32 = hours.trim().parse().ok()?;
        let minutes: u32 = minutes.trim().parse().ok()?;
        NaiveTime::from_hms_opt(hours, minutes, 0)
    }
}

// =============================================================================
// NOTIFICATION SOURCE WIRE TYPES
// =============================================================================

/// A task item carried in a notification-check result.
///
/// `kind` is a free string on the wire (`"type"`); the source is external
/// input and may supply values outside the known category set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTask {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Priority,
}

/// Result of one notification-source check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCheckResult {
    pub has_notifications: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<SourceTask>>,
    /// Source-side check time, Unix milliseconds.
    pub timestamp: i64,
}

impl NotificationCheckResult {
    /// An empty "nothing pending" result stamped with the current time.
    pub fn empty() -> Self {
        Self {
            has_notifications: false,
            message: None,
            tasks: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// A pending result with an optional message and task items.
    pub fn pending(message: Option<String>, tasks: Vec<SourceTask>) -> Self {
        Self {
            has_notifications: true,
            message,
            tasks: Some(tasks),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

// =============================================================================
// LIFECYCLE TYPES
// =============================================================================

/// Polling scheduler state. Owned exclusively by the scheduler; transitions
/// are the only mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollingState {
    Stopped,
    Running,
}

/// Platform capability probe, computed once at startup and passed into
/// components instead of repeated ad hoc environment checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub notifications_supported: bool,
    pub push_supported: bool,
    pub worker_supported: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            notifications_supported: true,
            push_supported: true,
            worker_supported: true,
        }
    }
}

impl Capabilities {
    /// A platform with no notification surface at all. Presentation degrades
    /// to a silent no-op.
    pub fn none() -> Self {
        Self {
            notifications_supported: false,
            push_supported: false,
            worker_supported: false,
        }
    }
}

/// User permission for showing notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Not yet requested.
    Default,
    Granted,
    Denied,
}

impl std::default::Default for PermissionState {
    fn default() -> Self {
        PermissionState::Default
    }
}

// =============================================================================
// PUSH SUBSCRIPTION
// =============================================================================

/// Push subscription keys as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// A push subscription registered with the mock push registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<PushKeys>,
}
