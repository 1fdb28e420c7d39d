//! Error types for the task monitor.
//!
//! Errors are classified by where they may propagate:
//! - `ConfigError`: startup only — the single fatal class.
//! - `MonitorError`: anything inside the scan/parse/schedule path. These
//!   are logged and absorbed; they never terminate the monitoring loop.

use std::path::PathBuf;
use thiserror::Error;

/// Unrecoverable startup errors. The process may exit on these before
/// entering the monitoring loop, never after.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Vault path does not exist: {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Runtime errors inside the monitoring loop.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Telegram API returned {status}: {body}")]
    Delivery { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid notification time '{value}': {reason}")]
    TimeParse { value: String, reason: String },

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl MonitorError {
    /// Returns true if this error is transient and worth retrying at a
    /// higher level. Reminder delivery deliberately never retries
    /// (at-most-once policy), so this is informational for logging.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MonitorError::Network(_) | MonitorError::Delivery { .. }
        )
    }
}
