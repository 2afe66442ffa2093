//! Task-derived notification planner.
//!
//! Invoked on every task-list change with a snapshot of the current tasks.
//! Computes which notification events should fire now (overdue, due within
//! 24 hours) and schedules exactly one future daily-summary presentation at
//! the configured time of day.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::time::sleep;
use tracing::{debug, info};

use taskping_core::defaults::UPCOMING_WINDOW_HOURS;
use taskping_core::{NotificationEvent, NotificationSettings, Presenter, Task};

/// Plans notification events from task state.
pub struct NotificationPlanner {
    presenter: Arc<dyn Presenter>,
}

impl NotificationPlanner {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    /// Run one planning pass over a task snapshot.
    ///
    /// Returns the instant the daily summary was deferred to, if one was
    /// scheduled. Earlier summary timers are not cancelled; each call arms a
    /// fresh one-shot.
    pub fn plan(
        &self,
        tasks: &[Task],
        settings: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.check_overdue(tasks, settings, now);
        self.check_upcoming(tasks, settings, now);
        self.schedule_daily_summary(tasks, settings, now)
    }

    /// One aggregate alert for all overdue tasks. The fixed dedup tag makes
    /// a re-run supersede the previous alert instead of stacking.
    fn check_overdue(&self, tasks: &[Task], settings: &NotificationSettings, now: DateTime<Utc>) {
        if !settings.overdue_alerts {
            return;
        }

        let overdue = tasks
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some_and(|due| due < now))
            .count();

        if overdue > 0 {
            info!(event_count = overdue, "presenting overdue alert");
            self.presenter.present(NotificationEvent::overdue_summary(overdue));
        }
    }

    /// One aggregate reminder for tasks due within the next 24 hours.
    fn check_upcoming(&self, tasks: &[Task], settings: &NotificationSettings, now: DateTime<Utc>) {
        if !settings.task_reminders {
            return;
        }

        let window_end = now + Duration::hours(UPCOMING_WINDOW_HOURS);
        let upcoming = tasks
            .iter()
            .filter(|t| {
                !t.completed
                    && t.due_date
                        .is_some_and(|due| due > now && due <= window_end)
            })
            .count();

        if upcoming > 0 {
            info!(event_count = upcoming, "presenting upcoming reminder");
            self.presenter.present(NotificationEvent::upcoming_summary(upcoming));
        }
    }

    /// Defer a daily summary to the next occurrence of the configured time
    /// of day: today if that time is still ahead, otherwise tomorrow.
    ///
    /// "Completed today" counts completed tasks whose *creation* date is
    /// today's calendar date — no completion timestamp is modeled.
    fn schedule_daily_summary(
        &self,
        tasks: &[Task],
        settings: &NotificationSettings,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if !settings.daily_summary {
            return None;
        }

        // Permissive settings: a value that names no real clock time simply
        // never fires.
        let Some(time_of_day) = settings.reminder_time_of_day() else {
            debug!(
                reminder_time = %settings.reminder_time,
                "reminder time does not parse, skipping daily summary"
            );
            return None;
        };

        let today_at = now.date_naive().and_time(time_of_day).and_utc();
        let target = if today_at > now {
            today_at
        } else {
            today_at + Duration::days(1)
        };
        let wait = (target - now).to_std().unwrap_or_default();

        debug!(scheduled_at = %target, "daily summary scheduled");

        let presenter = self.presenter.clone();
        let snapshot: Vec<Task> = tasks.to_vec();
        tokio::spawn(async move {
            sleep(wait).await;
            let today = Utc::now().date_naive();
            let pending = snapshot.iter().filter(|t| !t.completed).count();
            let completed_today = snapshot
                .iter()
                .filter(|t| t.completed && t.created_at.date_naive() == today)
                .count();
            presenter.present(NotificationEvent::daily_summary(pending, completed_today));
        });

        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingPresenter;
    use chrono::TimeZone;
    use taskping_core::{NotificationCategory, Priority};

    fn task(id: &str, completed: bool, due_offset_hours: Option<i64>, now: DateTime<Utc>) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            completed,
            priority: Priority::Medium,
            created_at: now,
            due_date: due_offset_hours.map(|h| now + Duration::hours(h)),
        }
    }

    fn enabled_settings() -> NotificationSettings {
        NotificationSettings {
            enabled: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_overdue_and_upcoming_are_separated() {
        let now = Utc::now();
        let tasks = vec![
            task("late", false, Some(-1), now),
            task("soon", false, Some(2), now),
            task("far", false, Some(48), now),
        ];
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        let mut settings = enabled_settings();
        settings.daily_summary = false;
        planner.plan(&tasks, &settings, now);

        let overdue = recording.events_of(NotificationCategory::Overdue);
        assert_eq!(overdue.len(), 1);
        assert!(overdue[0].body.contains("1 overdue"));

        let reminders = recording.events_of(NotificationCategory::Reminder);
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].body.contains("1 task(s) due"));

        // The 48h task triggered neither
        assert_eq!(recording.events().len(), 2);
    }

    #[tokio::test]
    async fn test_completed_tasks_never_alert() {
        let now = Utc::now();
        let tasks = vec![
            task("done-late", true, Some(-5), now),
            task("done-soon", true, Some(1), now),
            task("no-due", false, None, now),
        ];
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        let mut settings = enabled_settings();
        settings.daily_summary = false;
        planner.plan(&tasks, &settings, now);

        assert!(recording.events().is_empty());
    }

    #[tokio::test]
    async fn test_overdue_toggle_suppresses_only_overdue() {
        let now = Utc::now();
        let tasks = vec![task("late", false, Some(-1), now), task("soon", false, Some(2), now)];
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        let mut settings = enabled_settings();
        settings.daily_summary = false;
        settings.overdue_alerts = false;
        planner.plan(&tasks, &settings, now);

        assert!(recording.events_of(NotificationCategory::Overdue).is_empty());
        assert_eq!(recording.events_of(NotificationCategory::Reminder).len(), 1);
    }

    #[tokio::test]
    async fn test_reminder_toggle_suppresses_only_upcoming() {
        let now = Utc::now();
        let tasks = vec![task("late", false, Some(-1), now), task("soon", false, Some(2), now)];
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        let mut settings = enabled_settings();
        settings.daily_summary = false;
        settings.task_reminders = false;
        planner.plan(&tasks, &settings, now);

        assert_eq!(recording.events_of(NotificationCategory::Overdue).len(), 1);
        assert!(recording.events_of(NotificationCategory::Reminder).is_empty());
    }

    #[test]
    fn test_summary_scheduled_today_when_time_is_ahead() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = runtime.enter();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let planner = NotificationPlanner::new(Arc::new(RecordingPresenter::new()));

        let target = planner.plan(&[], &enabled_settings(), now).unwrap();
        assert_eq!(target, Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_summary_rolls_to_tomorrow_when_time_has_passed() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let _guard = runtime.enter();

        let now = Utc.with_ymd_and_hms(2026, 3, 10, 10, 30, 0).unwrap();
        let planner = NotificationPlanner::new(Arc::new(RecordingPresenter::new()));

        let target = planner.plan(&[], &enabled_settings(), now).unwrap();
        assert_eq!(target, Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_summary_disabled_or_unparseable_schedules_nothing() {
        let now = Utc::now();
        let planner = NotificationPlanner::new(Arc::new(RecordingPresenter::new()));

        let mut settings = enabled_settings();
        settings.daily_summary = false;
        assert_eq!(planner.plan(&[], &settings, now), None);

        let mut settings = enabled_settings();
        settings.reminder_time = "99:99".to_string();
        assert_eq!(planner.plan(&[], &settings, now), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_fires_with_pending_and_completed_counts() {
        let now = Utc::now();
        let tasks = vec![
            task("p1", false, None, now),
            task("p2", false, None, now),
            task("done", true, None, now),
        ];
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        // Alerts off so only the summary arrives
        let mut settings = enabled_settings();
        settings.overdue_alerts = false;
        settings.task_reminders = false;

        let target = planner.plan(&tasks, &settings, now).unwrap();
        let wait = (target - Utc::now()).to_std().unwrap();
        tokio::time::sleep(wait + std::time::Duration::from_secs(5)).await;

        let summaries = recording.events_of(NotificationCategory::DailySummary);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].body, "2 pending, 1 completed today");
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_plans_stack_summary_timers() {
        // Documented quirk: re-planning before the summary fires does not
        // cancel the earlier timer, so both fire.
        let now = Utc::now();
        let recording = Arc::new(RecordingPresenter::new());
        let planner = NotificationPlanner::new(recording.clone());

        let mut settings = enabled_settings();
        settings.overdue_alerts = false;
        settings.task_reminders = false;

        let target = planner.plan(&[], &settings, now).unwrap();
        planner.plan(&[], &settings, now).unwrap();

        let wait = (target - Utc::now()).to_std().unwrap();
        tokio::time::sleep(wait + std::time::Duration::from_secs(5)).await;

        assert_eq!(
            recording.events_of(NotificationCategory::DailySummary).len(),
            2
        );
    }
}
