//! Core data types shared across the crate.

use serde::{Deserialize, Serialize};

/// Checkbox state of a task line.
///
/// Only `[x]` maps to `Done`; every other single status character
/// (blank, `/`, digits, letters) is treated as `Todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Todo,
    Done,
}

/// Task complexity derived from the colored-square markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Complexity {
    pub fn emoji(self) -> &'static str {
        match self {
            Complexity::Low => "🟩",
            Complexity::Medium => "🟨",
            Complexity::High => "🟥",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

/// One checkbox line found in one file.
///
/// `filename` + `raw_line` is the stable identity of a task within the
/// index. Two identical lines in the same file are indistinguishable —
/// an accepted limitation of the format, not something to fix silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub filename: String,
    pub raw_line: String,
    /// Cleaned description with all recognized annotations stripped.
    pub task: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    /// Scheduled date (`📅 YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Completion date (`✅ YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    /// Completion timestamp (`@completed(YYYY-MM-DDTHH:MM:SS)`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<String>,
    /// Naive reminder time (`(@YYYY-MM-DD H:MM)`), interpreted in the
    /// configured timezone when the scheduler evaluates it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
    /// Estimated minutes, from the tomato marker times the configured
    /// per-tomato duration. 0 when no marker is present.
    pub duration: u32,
}

impl TaskRecord {
    /// Identity string used by the index and the notification dedup set.
    pub fn identity(&self) -> String {
        format!("{}:{}", self.filename, self.raw_line)
    }
}

/// Aggregated view of the task index for the summary message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryData {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub upcoming_notifications: Vec<UpcomingNotification>,
}

/// One entry of the upcoming-notifications digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingNotification {
    /// Task text, truncated to 50 characters with an ellipsis.
    pub task: String,
    /// Notification time as written in the source line.
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_combines_filename_and_raw_line() {
        let record = TaskRecord {
            status: TaskStatus::Todo,
            filename: "/vault/daily.md".to_string(),
            raw_line: "- [ ] Buy milk".to_string(),
            task: "Buy milk".to_string(),
            complexity: None,
            date: None,
            completed_date: None,
            completed: None,
            notification: None,
            duration: 0,
        };
        assert_eq!(record.identity(), "/vault/daily.md:- [ ] Buy milk");
    }

    #[test]
    fn test_complexity_levels() {
        assert_eq!(Complexity::Low.level(), 1);
        assert_eq!(Complexity::Medium.level(), 2);
        assert_eq!(Complexity::High.level(), 3);
        assert_eq!(Complexity::High.emoji(), "🟥");
        assert_eq!(Complexity::Medium.name(), "Medium");
    }
}
