//! Notification scheduler.
//!
//! On a fixed cadence the scheduler snapshots the task index and fires
//! a reminder for every TODO task whose notification time falls inside
//! the due window. Each identity fires at most once per process
//! lifetime: the dedup set is marked before delivery and regardless of
//! delivery outcome, and a transient send failure is not retried.
//! Tasks whose window passed while the process was not looking are
//! skipped forever; there is no catch-up.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::MonitorError;
use crate::state::MonitorState;
use crate::telegram;
use crate::types::TaskStatus;

/// Format of the notification annotation (hour may be 1 or 2 digits).
pub const NOTIFICATION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Reminders fire when the target time is between 0 and 5 minutes
/// away, both bounds inclusive.
pub const DUE_WINDOW_MINUTES: i64 = 5;

/// Parse a notification annotation and localize it in the configured
/// zone. Ambiguous or nonexistent local times (DST transitions) are
/// rejected the same way as malformed text.
pub fn parse_notification_time(value: &str, tz: Tz) -> Result<DateTime<Tz>, MonitorError> {
    let naive = NaiveDateTime::parse_from_str(value, NOTIFICATION_TIME_FORMAT).map_err(|e| {
        MonitorError::TimeParse {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;
    tz.from_local_datetime(&naive)
        .single()
        .ok_or_else(|| MonitorError::TimeParse {
            value: value.to_string(),
            reason: "ambiguous or nonexistent local time".to_string(),
        })
}

/// Due-window check: `0 <= target - now <= 5 minutes`, inclusive.
pub fn is_due(target: DateTime<Tz>, now: DateTime<Tz>) -> bool {
    let delta = target.signed_duration_since(now);
    delta >= Duration::zero() && delta <= Duration::minutes(DUE_WINDOW_MINUTES)
}

/// One scheduler tick at the current time.
pub fn check_notifications(state: &Arc<MonitorState>) -> usize {
    let now = Utc::now().with_timezone(&state.config.timezone);
    check_notifications_at(state, now)
}

/// One scheduler tick at an explicit time. Returns how many reminders
/// fired. Delivery is spawned onto the runtime so a slow send never
/// delays the next tick or blocks index mutation.
pub fn check_notifications_at(state: &Arc<MonitorState>, now: DateTime<Tz>) -> usize {
    let tasks = state.snapshot();
    let mut fired = 0;

    for task in tasks {
        if task.status != TaskStatus::Todo {
            continue;
        }
        let Some(notification) = task.notification.as_deref() else {
            continue;
        };

        let identity = task.identity();
        if state.is_notified(&identity) {
            continue;
        }

        let target = match parse_notification_time(notification, state.config.timezone) {
            Ok(target) => target,
            Err(e) => {
                log::error!("{}", e);
                continue;
            }
        };

        if is_due(target, now) {
            log::info!("Notification due: {}", task.task);
            // Marked before the send and regardless of its outcome:
            // at-most-once per process lifetime.
            state.mark_notified(identity);
            fired += 1;

            let config = state.config.clone();
            tokio::spawn(async move {
                telegram::send_task_notification(&config, &task).await;
            });
        }
    }

    if fired > 0 {
        log::info!("Processed {} notification(s)", fired);
    }
    fired
}

/// Scheduler loop: one tick per poll interval until the task is
/// aborted at shutdown.
pub async fn run(state: Arc<MonitorState>) {
    let mut interval =
        tokio::time::interval(StdDuration::from_secs(state.config.poll_interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        check_notifications(&state);
    }
}
