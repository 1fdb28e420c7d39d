//! Summary builder.
//!
//! Aggregates a task index snapshot into counts plus a short digest of
//! reminders coming up in the next 24 hours.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::scheduler::parse_notification_time;
use crate::types::{SummaryData, TaskRecord, TaskStatus, UpcomingNotification};

/// Upcoming-notifications digest is capped to this many entries.
pub const SUMMARY_MAX_NOTIFICATIONS: usize = 5;

/// Task text preview length in the digest.
pub const TASK_PREVIEW_CHARS: usize = 50;

/// Build summary data from a task snapshot at the given time.
///
/// Upcoming entries are TODO tasks with a parseable notification inside
/// `[now, now + 24h]`, sorted ascending by time string and capped to
/// the first five. Unparseable notification strings are skipped.
pub fn build_summary(tasks: &[TaskRecord], now: DateTime<Tz>) -> SummaryData {
    let tz = now.timezone();
    let total_tasks = tasks.len();
    let completed_tasks = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();
    let pending_tasks = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Todo)
        .count();

    let horizon = now + Duration::hours(24);
    let mut upcoming_notifications = Vec::new();

    for task in tasks {
        if task.status != TaskStatus::Todo || task.task.is_empty() {
            continue;
        }
        let Some(notification) = task.notification.as_deref() else {
            continue;
        };
        let Ok(target) = parse_notification_time(notification, tz) else {
            continue;
        };
        if now <= target && target <= horizon {
            upcoming_notifications.push(UpcomingNotification {
                task: truncate_task(&task.task),
                time: notification.to_string(),
            });
        }
    }

    upcoming_notifications.sort_by(|a, b| a.time.cmp(&b.time));
    upcoming_notifications.truncate(SUMMARY_MAX_NOTIFICATIONS);

    SummaryData {
        total_tasks,
        completed_tasks,
        pending_tasks,
        upcoming_notifications,
    }
}

fn truncate_task(task: &str) -> String {
    if task.chars().count() > TASK_PREVIEW_CHARS {
        let mut preview: String = task.chars().take(TASK_PREVIEW_CHARS).collect();
        preview.push_str("...");
        preview
    } else {
        task.to_string()
    }
}
