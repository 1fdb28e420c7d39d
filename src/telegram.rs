//! Telegram Bot API delivery.
//!
//! Thin `sendMessage` client plus the three message kinds the monitor
//! emits (reminder, summary, file error). The high-level senders log
//! failures and swallow them: delivery problems must never propagate
//! into the scan or schedule paths.

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::MonitorError;
use crate::summary::build_summary;
use crate::templates;
use crate::types::TaskRecord;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Send one already-rendered message. Unconfigured delivery is a
/// warning and `Ok`; a non-2xx response or transport failure is an
/// error for the caller to log.
pub async fn send_message(config: &Config, text: &str) -> Result<(), MonitorError> {
    let Some((token, chat_id)) = config.delivery() else {
        log::warn!("Telegram bot token not configured, skipping send");
        return Ok(());
    };

    let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, token);
    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&SendMessageRequest {
            chat_id,
            text,
            parse_mode: "Markdown",
        })
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        // Telegram error bodies are JSON with a "description" field;
        // fall back to the raw body when they are not.
        let body = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("description")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);
        return Err(MonitorError::Delivery {
            status: status.as_u16(),
            body: detail,
        });
    }
    Ok(())
}

/// Send a reminder for one due task.
pub async fn send_task_notification(config: &Config, task: &TaskRecord) {
    let context = templates::task_context(task);
    let message = templates::render(config, templates::NOTIFICATION, &context);

    match send_message(config, &message).await {
        Ok(()) => log::info!("Notification sent: {}", task.task),
        Err(e) => log::error!("Failed to send notification: {}", e),
    }
}

/// Build and send the task summary for the given snapshot.
pub async fn send_task_summary(config: &Config, tasks: &[TaskRecord]) {
    let now = Utc::now().with_timezone(&config.timezone);
    let summary = build_summary(tasks, now);
    let context = templates::summary_context(&summary, now);
    let message = templates::render(config, templates::TASK_SUMMARY, &context);

    match send_message(config, &message).await {
        Ok(()) => log::info!("Task summary sent"),
        Err(e) => log::error!("Failed to send summary: {}", e),
    }
}

/// Send a file-processing error notification.
pub async fn send_error_notification(config: &Config, error_message: &str, filename: Option<&str>) {
    let now = Utc::now().with_timezone(&config.timezone);
    let context = templates::error_context(error_message, filename, now);
    let message = templates::render(config, templates::ERROR_NOTIFICATION, &context);

    match send_message(config, &message).await {
        Ok(()) => log::info!("Error notification sent"),
        Err(e) => log::error!("Failed to send error notification: {}", e),
    }
}
