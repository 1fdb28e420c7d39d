//! Environment-sourced configuration.
//!
//! Every knob has a default so the monitor can start with nothing but a
//! vault directory. Validation happens once here; a bad value is the
//! only thing allowed to stop the process before the loop starts.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::ConfigError;

/// Default scheduler tick, seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default minutes represented by one tomato marker.
pub const DEFAULT_TOMATO_MINUTES: u32 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Monitored vault root, canonicalized so index keys stay consistent
    /// between the full scan and watcher events.
    pub vault_path: PathBuf,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub timezone: Tz,
    /// Minutes per tomato marker (`[🍅::n]` → `n * tomato_minutes`).
    pub tomato_minutes: u32,
    pub poll_interval_secs: u64,
    /// Optional directory of message template overrides.
    pub templates_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        let vault_path = PathBuf::from(env_or("VAULT_PATH", "./vault"));
        let vault_path = vault_path
            .canonicalize()
            .map_err(|_| ConfigError::VaultNotFound(vault_path.clone()))?;

        let timezone_name = env_or("TIMEZONE", "UTC");
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name.clone()))?;

        let tomato_minutes = parse_env("TOMATO_MINUTES", DEFAULT_TOMATO_MINUTES)?;
        let poll_interval_secs = parse_env("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        Ok(Config {
            vault_path,
            bot_token: non_empty(env::var("TELEGRAM_BOT_TOKEN").ok()),
            chat_id: non_empty(env::var("TELEGRAM_CHAT_ID").ok()),
            timezone,
            tomato_minutes,
            poll_interval_secs,
            templates_dir: env::var("TEMPLATES_DIR").ok().map(PathBuf::from),
        })
    }

    /// Token and chat id, when both are usable. `None` means delivery is
    /// disabled: sends are skipped with a warning instead of failing.
    pub fn delivery(&self) -> Option<(&str, &str)> {
        match (self.bot_token.as_deref(), self.chat_id.as_deref()) {
            (Some(token), Some(chat_id)) => Some((token, chat_id)),
            _ => None,
        }
    }

    pub fn delivery_configured(&self) -> bool {
        self.delivery().is_some()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Treat empty and placeholder values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && !v.starts_with("your_"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_filters_placeholders() {
        assert_eq!(non_empty(Some("abc123".to_string())), Some("abc123".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("your_bot_token_here".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_delivery_requires_both_token_and_chat() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = test_support::test_config(dir.path());
        assert!(!config.delivery_configured());

        config.bot_token = Some("123:abc".to_string());
        assert!(!config.delivery_configured());

        config.chat_id = Some("42".to_string());
        assert_eq!(config.delivery(), Some(("123:abc", "42")));
    }
}
