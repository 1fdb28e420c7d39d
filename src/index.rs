//! In-memory task index.
//!
//! Holds every task record currently known for the monitored tree,
//! keyed by (filename, raw line). Mutation happens only through full
//! rebuild or per-file replace/delete; the index never normalizes
//! paths — callers route them through the scanner first.

use crate::types::TaskRecord;

#[derive(Debug, Default)]
pub struct TaskIndex {
    records: Vec<TaskRecord>,
}

impl TaskIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the entire index content with a fresh full-scan result.
    pub fn full_rebuild(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
    }

    /// Remove every record belonging to `path`, then insert `records`.
    /// Calling with an empty vec acts as a pure delete. Returns
    /// (removed, added) counts for logging.
    pub fn replace_file(&mut self, path: &str, records: Vec<TaskRecord>) -> (usize, usize) {
        let before = self.records.len();
        self.records.retain(|task| task.filename != path);
        let removed = before - self.records.len();
        let added = records.len();
        self.records.extend(records);
        (removed, added)
    }

    /// Remove every record belonging to `path`. Returns how many were
    /// removed.
    pub fn delete_file(&mut self, path: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|task| task.filename != path);
        before - self.records.len()
    }

    /// Full read-only copy for the scheduler and summary builder.
    pub fn snapshot(&self) -> Vec<TaskRecord> {
        self.records.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;

    fn record(filename: &str, raw_line: &str) -> TaskRecord {
        TaskRecord {
            status: TaskStatus::Todo,
            filename: filename.to_string(),
            raw_line: raw_line.to_string(),
            task: raw_line.trim_start_matches("- [ ] ").to_string(),
            complexity: None,
            date: None,
            completed_date: None,
            completed: None,
            notification: None,
            duration: 0,
        }
    }

    #[test]
    fn test_replace_file_swaps_only_that_file() {
        let mut index = TaskIndex::new();
        index.full_rebuild(vec![
            record("a.md", "- [ ] one"),
            record("a.md", "- [ ] two"),
            record("b.md", "- [ ] keep"),
        ]);

        let (removed, added) = index.replace_file("a.md", vec![record("a.md", "- [ ] new")]);
        assert_eq!((removed, added), (2, 1));
        assert_eq!(index.len(), 2);

        let snapshot = index.snapshot();
        assert!(snapshot.iter().any(|t| t.filename == "b.md"));
        assert!(snapshot.iter().any(|t| t.raw_line == "- [ ] new"));
    }

    #[test]
    fn test_replace_file_is_idempotent() {
        let mut index = TaskIndex::new();
        let records = vec![record("a.md", "- [ ] one"), record("a.md", "- [ ] two")];

        index.replace_file("a.md", records.clone());
        let first = index.snapshot();
        index.replace_file("a.md", records);
        assert_eq!(index.snapshot(), first);
    }

    #[test]
    fn test_replace_with_empty_acts_as_delete() {
        let mut index = TaskIndex::new();
        index.full_rebuild(vec![record("a.md", "- [ ] gone"), record("b.md", "- [ ] keep")]);

        index.replace_file("a.md", Vec::new());
        assert_eq!(index.len(), 1);
        assert_eq!(index.snapshot()[0].filename, "b.md");
    }

    #[test]
    fn test_delete_file_removes_all_records_for_path() {
        let mut index = TaskIndex::new();
        index.full_rebuild(vec![
            record("a.md", "- [ ] one"),
            record("a.md", "- [ ] two"),
            record("b.md", "- [ ] keep"),
        ]);

        assert_eq!(index.delete_file("a.md"), 2);
        assert_eq!(index.delete_file("a.md"), 0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_full_rebuild_replaces_everything() {
        let mut index = TaskIndex::new();
        index.full_rebuild(vec![record("a.md", "- [ ] old")]);
        index.full_rebuild(vec![record("b.md", "- [ ] new")]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.snapshot()[0].filename, "b.md");
    }

    #[test]
    fn test_duplicate_lines_are_kept_as_distinct_records() {
        // Two identical lines in one file share an identity; the index
        // keeps both and does not try to be clever about it.
        let mut index = TaskIndex::new();
        index.full_rebuild(vec![record("a.md", "- [ ] dup"), record("a.md", "- [ ] dup")]);
        assert_eq!(index.len(), 2);
    }
}
