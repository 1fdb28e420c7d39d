//! Process-wide shared state.
//!
//! The task index and the notification dedup set live behind one
//! `MonitorState`, shared as `Arc` between the watcher handler and the
//! scheduler. Each lock is held for a whole operation so snapshots
//! never observe a partially applied replace. Poisoned locks degrade
//! to a no-op or an empty read; they never take the loop down.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::config::Config;
use crate::index::TaskIndex;
use crate::types::TaskRecord;

pub struct MonitorState {
    pub config: Config,
    index: Mutex<TaskIndex>,
    notified: Mutex<HashSet<String>>,
}

impl MonitorState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: Mutex::new(TaskIndex::new()),
            notified: Mutex::new(HashSet::new()),
        }
    }

    /// Replace the whole index after a full vault scan.
    pub fn rebuild_index(&self, records: Vec<TaskRecord>) {
        if let Ok(mut index) = self.index.lock() {
            index.full_rebuild(records);
            log::info!("Index rebuilt: {} task(s)", index.len());
        }
    }

    /// Swap all records for one file.
    pub fn replace_file(&self, path: &str, records: Vec<TaskRecord>) {
        if let Ok(mut index) = self.index.lock() {
            let (removed, added) = index.replace_file(path, records);
            log::info!(
                "Updated {}: removed {}, added {}. Total tasks: {}",
                path,
                removed,
                added,
                index.len()
            );
        }
    }

    /// Drop all records for one file.
    pub fn delete_file(&self, path: &str) {
        if let Ok(mut index) = self.index.lock() {
            let removed = index.delete_file(path);
            log::info!("Removed {} task(s) from {}", removed, path);
        }
    }

    /// Consistent full-index copy for readers.
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        self.index
            .lock()
            .map(|index| index.snapshot())
            .unwrap_or_default()
    }

    pub fn task_count(&self) -> usize {
        self.index.lock().map(|index| index.len()).unwrap_or(0)
    }

    /// Returns true if this identity was already notified.
    pub fn is_notified(&self, identity: &str) -> bool {
        self.notified
            .lock()
            .map(|set| set.contains(identity))
            .unwrap_or(false)
    }

    /// Record an identity as notified. Returns true when it was newly
    /// inserted, false when it had already fired.
    pub fn mark_notified(&self, identity: String) -> bool {
        self.notified
            .lock()
            .map(|mut set| set.insert(identity))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_config;
    use crate::types::{TaskRecord, TaskStatus};
    use std::path::Path;

    fn state() -> MonitorState {
        MonitorState::new(test_config(Path::new("/tmp/vault")))
    }

    fn record(filename: &str, raw_line: &str) -> TaskRecord {
        TaskRecord {
            status: TaskStatus::Todo,
            filename: filename.to_string(),
            raw_line: raw_line.to_string(),
            task: String::new(),
            complexity: None,
            date: None,
            completed_date: None,
            completed: None,
            notification: None,
            duration: 0,
        }
    }

    #[test]
    fn test_rebuild_then_replace_then_delete() {
        let state = state();
        state.rebuild_index(vec![record("a.md", "- [ ] x"), record("b.md", "- [ ] y")]);
        assert_eq!(state.task_count(), 2);

        state.replace_file("a.md", vec![record("a.md", "- [ ] z")]);
        assert_eq!(state.task_count(), 2);

        state.delete_file("a.md");
        assert_eq!(state.task_count(), 1);
        assert_eq!(state.snapshot()[0].filename, "b.md");
    }

    #[test]
    fn test_mark_notified_is_monotonic() {
        let state = state();
        assert!(!state.is_notified("a.md:- [ ] x"));
        assert!(state.mark_notified("a.md:- [ ] x".to_string()));
        assert!(state.is_notified("a.md:- [ ] x"));
        assert!(!state.mark_notified("a.md:- [ ] x".to_string()));
    }
}
