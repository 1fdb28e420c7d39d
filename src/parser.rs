//! Checkbox task line parser.
//!
//! Turns one raw markdown line into a [`TaskRecord`], or `None` when the
//! line is not a task. The grammar is `- [<c>] <data>` where `<c>` is a
//! single word/space/slash character and `<data>` must not start with a
//! colon. Annotations inside `<data>` are extracted independently, in a
//! fixed order, each stripped from the text as it is recognized so the
//! final `task` field is annotation-free.
//!
//! Parsing is total: malformed annotation content leaves the field
//! absent and never produces an error. When a glyph is present but the
//! digits after it are malformed, the text is deliberately left in
//! place (matching the observed cleanup ordering of the format).

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Complexity, TaskRecord, TaskStatus};

/// Substring check done before running the full grammar: a line without
/// either checkbox marker is never a task.
pub const CHECKBOX_OPEN: &str = "- [ ]";
pub const CHECKBOX_CLOSED: &str = "- [x]";

// Compile-once regex patterns via OnceLock.
fn task_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s*\[([\w\s/])\]\s*([^:].*)").unwrap())
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"📅\s*(\d{4}-\d{2}-\d{2})").unwrap())
}

fn completed_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"✅\s*(\d{4}-\d{2}-\d{2})").unwrap())
}

fn completed_ts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@completed\((\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})\)").unwrap())
}

fn notification_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(@(\d{4}-\d{2}-\d{2}\s\d{1,2}:\d{2})\)").unwrap())
}

fn tomato_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[🍅::(\d+)\]").unwrap())
}

fn tomato_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\[🍅::\d+\]\s*").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Parse one line into a task record.
///
/// `tomato_minutes` is the configured per-tomato duration multiplier.
/// Returns `None` for anything that does not match the checkbox grammar.
pub fn parse_task(line: &str, filename: &str, tomato_minutes: u32) -> Option<TaskRecord> {
    let caps = task_re().captures(line)?;
    let status_char = caps.get(1)?.as_str();
    let mut data = caps.get(2)?.as_str().to_string();

    // Only 'x' is a completed checkbox; every other status character
    // (blank, '/', digits) is an open task.
    let status = if status_char == "x" {
        TaskStatus::Done
    } else {
        TaskStatus::Todo
    };

    // Complexity markers, low to high; a later match overrides.
    let mut complexity = None;
    if data.contains("🟩") {
        data = data.replace("🟩", "");
        complexity = Some(Complexity::Low);
    }
    if data.contains("🟨") {
        data = data.replace("🟨", "");
        complexity = Some(Complexity::Medium);
    }
    if data.contains("🟥") {
        data = data.replace("🟥", "");
        complexity = Some(Complexity::High);
    }

    let mut date = None;
    if data.contains("📅") {
        if let Some(m) = date_re().captures(&data) {
            date = Some(m[1].to_string());
            data = date_re().replace_all(&data, "").into_owned();
        }
    }

    let mut completed_date = None;
    if data.contains("✅") {
        if let Some(m) = completed_date_re().captures(&data) {
            let value = m[1].to_string();
            data = data.replace(&format!("✅ {value}"), "");
            completed_date = Some(value);
        }
    }

    let mut completed = None;
    if data.contains("@completed(") {
        if let Some(m) = completed_ts_re().captures(&data) {
            let value = m[1].to_string();
            data = data.replace(&format!("@completed({value})"), "");
            completed = Some(value);
        }
    }

    let mut notification = None;
    if data.contains("(@") {
        if let Some(m) = notification_re().captures(&data) {
            let value = m[1].to_string();
            data = data.replace(&format!("(@{value})"), "");
            notification = Some(value);
        }
    }

    let mut duration = 0;
    if data.contains("[🍅") {
        if let Some(m) = tomato_re().captures(&data) {
            if let Ok(count) = m[1].parse::<u32>() {
                duration = count.saturating_mul(tomato_minutes);
                data = tomato_strip_re().replace_all(&data, " ").into_owned();
            }
        }
    }

    let task = whitespace_re().replace_all(&data, " ").trim().to_string();

    Some(TaskRecord {
        status,
        filename: filename.to_string(),
        raw_line: line.trim().to_string(),
        task,
        complexity,
        date,
        completed_date,
        completed,
        notification,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOMATO: u32 = 30;

    fn parse(line: &str) -> Option<TaskRecord> {
        parse_task(line, "daily.md", TOMATO)
    }

    #[test]
    fn test_open_task_with_date_and_notification() {
        let record = parse("- [ ] Buy milk 📅 2025-01-10 (@2025-01-10 09:00)").unwrap();
        assert_eq!(record.status, TaskStatus::Todo);
        assert_eq!(record.date.as_deref(), Some("2025-01-10"));
        assert_eq!(record.notification.as_deref(), Some("2025-01-10 09:00"));
        assert_eq!(record.task, "Buy milk");
    }

    #[test]
    fn test_done_task_with_completed_date() {
        let record = parse("- [x] Pay bills ✅ 2025-01-05").unwrap();
        assert_eq!(record.status, TaskStatus::Done);
        assert_eq!(record.completed_date.as_deref(), Some("2025-01-05"));
        assert_eq!(record.task, "Pay bills");
    }

    #[test]
    fn test_tomato_duration() {
        let record = parse("- [ ] Review PR [🍅::2]").unwrap();
        assert_eq!(record.duration, 60);
        assert_eq!(record.task, "Review PR");
    }

    #[test]
    fn test_non_task_line_yields_none() {
        assert!(parse("Just a note").is_none());
        assert!(parse("").is_none());
        assert!(parse("# Heading").is_none());
    }

    #[test]
    fn test_data_must_not_start_with_colon() {
        assert!(parse("- [ ]: config note").is_none());
    }

    #[test]
    fn test_no_annotations_round_trip() {
        let record = parse("- [ ]   Water the plants  ").unwrap();
        assert_eq!(record.task, "Water the plants");
        assert_eq!(record.duration, 0);
        assert_eq!(record.notification, None);
        assert_eq!(record.date, None);
        assert_eq!(record.complexity, None);
        assert_eq!(record.raw_line, "- [ ]   Water the plants");
    }

    #[test]
    fn test_extended_status_chars_map_to_todo() {
        for line in ["- [/] In progress", "- [?] Question", "- [5] Numbered"] {
            let record = parse(line).unwrap();
            assert_eq!(record.status, TaskStatus::Todo, "line: {line}");
        }
    }

    #[test]
    fn test_complexity_markers() {
        assert_eq!(
            parse("- [ ] Easy one 🟩").unwrap().complexity,
            Some(Complexity::Low)
        );
        assert_eq!(
            parse("- [ ] Mid one 🟨").unwrap().complexity,
            Some(Complexity::Medium)
        );
        assert_eq!(
            parse("- [ ] Hard one 🟥").unwrap().complexity,
            Some(Complexity::High)
        );
    }

    #[test]
    fn test_multiple_complexity_markers_last_wins() {
        let record = parse("- [ ] Confused 🟩 🟥").unwrap();
        assert_eq!(record.complexity, Some(Complexity::High));
        assert_eq!(record.task, "Confused");
    }

    #[test]
    fn test_completed_timestamp() {
        let record = parse("- [x] Ship release @completed(2025-02-01T18:30:00)").unwrap();
        assert_eq!(record.completed.as_deref(), Some("2025-02-01T18:30:00"));
        assert_eq!(record.task, "Ship release");
    }

    #[test]
    fn test_single_digit_hour_notification() {
        let record = parse("- [ ] Standup (@2025-03-04 9:15)").unwrap();
        assert_eq!(record.notification.as_deref(), Some("2025-03-04 9:15"));
        assert_eq!(record.task, "Standup");
    }

    #[test]
    fn test_malformed_date_left_in_task() {
        // Glyph present but digits malformed: field absent, text kept.
        let record = parse("- [ ] Call mom 📅 2025-1-9").unwrap();
        assert_eq!(record.date, None);
        assert!(record.task.contains("📅 2025-1-9"));
    }

    #[test]
    fn test_malformed_notification_left_absent() {
        let record = parse("- [ ] Ping ops (@tomorrow 9:00)").unwrap();
        assert_eq!(record.notification, None);
    }

    #[test]
    fn test_all_annotations_together() {
        let record =
            parse("- [ ] Plan sprint 🟨 📅 2025-04-01 (@2025-04-01 10:00) [🍅::3]").unwrap();
        assert_eq!(record.complexity, Some(Complexity::Medium));
        assert_eq!(record.date.as_deref(), Some("2025-04-01"));
        assert_eq!(record.notification.as_deref(), Some("2025-04-01 10:00"));
        assert_eq!(record.duration, 90);
        assert_eq!(record.task, "Plan sprint");
    }

    #[test]
    fn test_parse_is_total_over_junk() {
        for line in [
            "- [",
            "- [] broken",
            "- [xx] two chars",
            "\u{0}\u{1}binary-ish",
            "- [ ]",
        ] {
            // Must not panic; None or Some are both acceptable shapes.
            let _ = parse(line);
        }
    }

    #[test]
    fn test_indented_task_matches() {
        let record = parse("    - [ ] Nested item").unwrap();
        assert_eq!(record.task, "Nested item");
        assert_eq!(record.raw_line, "- [ ] Nested item");
    }
}
