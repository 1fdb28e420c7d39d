//! File and vault scanning.
//!
//! `scan_file` reads one markdown file and runs candidate lines through
//! the parser. `scan_vault` walks the whole tree in deterministic
//! (lexicographic) order. Non-markdown and missing paths contribute
//! nothing; an unreadable existing `.md` file is the only reportable
//! error, and even that never aborts a tree walk.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::MonitorError;
use crate::parser::{parse_task, CHECKBOX_CLOSED, CHECKBOX_OPEN};
use crate::types::TaskRecord;

/// Resolve a path against the vault root. Absolute paths pass through
/// untouched; the index is keyed by whatever string this produces, so
/// every caller must route paths through here.
pub fn resolve_vault_path(path: &Path, config: &Config) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.vault_path.join(path)
    }
}

/// Index key for a path: the resolved path as a string.
pub fn path_key(path: &Path, config: &Config) -> String {
    resolve_vault_path(path, config).to_string_lossy().into_owned()
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}

/// Scan one file and return its tasks in line order.
///
/// Non-`.md` or nonexistent paths yield `Ok(empty)`. A read failure on
/// an existing `.md` file is returned to the caller, which decides how
/// to report it (log, error notification) — the records are still zero
/// for this pass either way.
pub fn scan_file(path: &Path, config: &Config) -> Result<Vec<TaskRecord>, MonitorError> {
    let resolved = resolve_vault_path(path, config);

    if !is_markdown(&resolved) || !resolved.exists() {
        return Ok(Vec::new());
    }

    // Permissive decoding: invalid byte sequences are replaced, never fatal.
    let bytes = fs::read(&resolved).map_err(|source| MonitorError::FileRead {
        path: resolved.to_string_lossy().into_owned(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let filename = resolved.to_string_lossy();
    let mut tasks = Vec::new();
    for line in content.lines() {
        if line.contains(CHECKBOX_OPEN) || line.contains(CHECKBOX_CLOSED) {
            if let Some(task) = parse_task(line, &filename, config.tomato_minutes) {
                tasks.push(task);
            }
        }
    }

    log::info!("Scanned {}: {} task(s)", filename, tasks.len());
    Ok(tasks)
}

/// Walk the vault tree and scan every `.md` file exactly once.
///
/// The walk is sorted by file name so index order is deterministic
/// within one process. Per-file read errors are logged and skipped.
pub fn scan_vault(config: &Config) -> Vec<TaskRecord> {
    log::info!("Scanning all files in {}...", config.vault_path.display());

    let mut records = Vec::new();
    for entry in WalkDir::new(&config.vault_path)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Walk error under {}: {}", config.vault_path.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        match scan_file(entry.path(), config) {
            Ok(tasks) => records.extend(tasks),
            Err(e) => log::error!("{}", e),
        }
    }

    log::info!("Scan complete. Found {} task(s)", records.len());
    records
}
