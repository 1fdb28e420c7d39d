//! Message templates for Telegram notifications.
//!
//! Templates are plain text with `{placeholder}` substitution from a
//! string context. Built-in defaults cover every message kind; a file
//! named `<TEMPLATES_DIR>/<name>.txt` overrides the default and is
//! cached after first load. Rendering never fails outward: any load
//! problem falls back to the built-in, and an unknown template name
//! renders a minimal message referencing the raw task description.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::Config;
use crate::types::{SummaryData, TaskRecord, TaskStatus};

pub const NOTIFICATION: &str = "notification";
pub const TASK_SUMMARY: &str = "task_summary";
pub const ERROR_NOTIFICATION: &str = "error_notification";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const NOTIFICATION_TEMPLATE: &str = "🔔 *Task Reminder*\n\n\
{task}\n\n\
🕐 Time: {notification_time}\n\
📄 File: {filename}\n\
{complexity_emoji} Complexity: {complexity_name}\n\
⏱ Duration: {duration} min";

const TASK_SUMMARY_TEMPLATE: &str = "📋 *Task Summary* ({current_time})\n\n\
📊 Total: {total_tasks}\n\
✅ Completed: {completed_tasks}\n\
⏳ Pending: {pending_tasks}\n\n\
🔔 *Upcoming in 24h*\n\
{upcoming}";

const ERROR_TEMPLATE: &str = "⚠️ *{error_type}*\n\n\
{error_message}\n\
📄 File: {filename}\n\
🕐 {error_time}";

/// Minimal synthesized message used when no template matches.
const FALLBACK_TEMPLATE: &str = "Reminder: {task}";

fn template_cache() -> &'static Mutex<HashMap<String, String>> {
    static CACHE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn builtin_template(name: &str) -> &'static str {
    match name {
        NOTIFICATION => NOTIFICATION_TEMPLATE,
        TASK_SUMMARY => TASK_SUMMARY_TEMPLATE,
        ERROR_NOTIFICATION => ERROR_TEMPLATE,
        _ => {
            log::warn!("Unknown template '{}', using fallback", name);
            FALLBACK_TEMPLATE
        }
    }
}

/// Template text for `name`: override file if configured and readable,
/// built-in otherwise. File loads are cached for the process lifetime.
fn load_template(config: &Config, name: &str) -> String {
    let Some(dir) = config.templates_dir.as_deref() else {
        return builtin_template(name).to_string();
    };

    if let Ok(cache) = template_cache().lock() {
        if let Some(text) = cache.get(name) {
            return text.clone();
        }
    }

    let path = dir.join(format!("{name}.txt"));
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            if path.exists() {
                log::error!("Failed to load template {}: {}", path.display(), e);
            }
            builtin_template(name).to_string()
        }
    };

    if let Ok(mut cache) = template_cache().lock() {
        cache.insert(name.to_string(), text.clone());
    }
    text
}

/// Render a named template with the given context.
pub fn render(config: &Config, name: &str, context: &HashMap<String, String>) -> String {
    let mut text = load_template(config, name);
    for (key, value) in context {
        text = text.replace(&format!("{{{key}}}"), value);
    }
    text.trim().to_string()
}

/// Context for a single-task reminder.
pub fn task_context(task: &TaskRecord) -> HashMap<String, String> {
    let mut context = HashMap::new();
    context.insert("task".to_string(), task.task.clone());
    context.insert(
        "notification_time".to_string(),
        task.notification.clone().unwrap_or_else(|| "not set".to_string()),
    );
    context.insert("filename".to_string(), basename(&task.filename));
    context.insert(
        "complexity_emoji".to_string(),
        task.complexity.map(|c| c.emoji()).unwrap_or("▫️").to_string(),
    );
    context.insert(
        "complexity_name".to_string(),
        task.complexity.map(|c| c.name()).unwrap_or("not set").to_string(),
    );
    context.insert("duration".to_string(), task.duration.to_string());
    context.insert(
        "status".to_string(),
        match task.status {
            TaskStatus::Todo => "TODO".to_string(),
            TaskStatus::Done => "DONE".to_string(),
        },
    );
    context.insert("raw_line".to_string(), task.raw_line.clone());
    context
}

/// Context for the summary message.
pub fn summary_context(summary: &SummaryData, now: DateTime<Tz>) -> HashMap<String, String> {
    let upcoming = if summary.upcoming_notifications.is_empty() {
        "none".to_string()
    } else {
        summary
            .upcoming_notifications
            .iter()
            .map(|n| format!("- {}: {}", n.time, n.task))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut context = HashMap::new();
    context.insert("total_tasks".to_string(), summary.total_tasks.to_string());
    context.insert(
        "completed_tasks".to_string(),
        summary.completed_tasks.to_string(),
    );
    context.insert(
        "pending_tasks".to_string(),
        summary.pending_tasks.to_string(),
    );
    context.insert("upcoming".to_string(), upcoming);
    context.insert(
        "current_time".to_string(),
        now.format(TIME_FORMAT).to_string(),
    );
    context
}

/// Context for a file-processing error message.
pub fn error_context(
    error_message: &str,
    filename: Option<&str>,
    now: DateTime<Tz>,
) -> HashMap<String, String> {
    let mut context = HashMap::new();
    context.insert(
        "error_type".to_string(),
        "File processing error".to_string(),
    );
    context.insert("error_message".to_string(), error_message.to_string());
    context.insert(
        "filename".to_string(),
        filename.map(basename).unwrap_or_else(|| "unknown".to_string()),
    );
    context.insert("error_time".to_string(), now.format(TIME_FORMAT).to_string());
    context
}

fn basename<S: AsRef<str>>(path: S) -> String {
    Path::new(path.as_ref())
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.as_ref().to_string())
}
