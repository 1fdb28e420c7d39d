//! File watcher for the vault directory.
//!
//! Bridges `notify` filesystem events into incremental task index
//! updates. The notify callback runs on the watcher's own thread and
//! only forwards simplified events over a channel; the async handler
//! task owns all index mutation. Handlers are idempotent, so duplicate
//! or out-of-order events cannot corrupt the index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::MonitorError;
use crate::scanner::{path_key, resolve_vault_path, scan_file};
use crate::state::MonitorState;
use crate::telegram;

/// Channel buffer size for watcher events
const WATCH_CHANNEL_SIZE: usize = 64;

/// Simplified filesystem event after mapping from `notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// File created or modified: rescan and replace its records.
    Upsert(PathBuf),
    /// File removed: drop its records.
    Remove(PathBuf),
    /// File moved: drop records at the source, rescan the destination.
    Rename { from: PathBuf, to: PathBuf },
}

/// Map a raw notify event to zero or more vault events.
pub fn map_event(event: &Event) -> Vec<VaultEvent> {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            vec![VaultEvent::Rename {
                from: event.paths[0].clone(),
                to: event.paths[1].clone(),
            }]
        }
        // Rename halves delivered separately (platform dependent).
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().cloned().map(VaultEvent::Remove).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().cloned().map(VaultEvent::Upsert).collect()
        }
        EventKind::Create(_) | EventKind::Modify(_) => {
            event.paths.iter().cloned().map(VaultEvent::Upsert).collect()
        }
        EventKind::Remove(_) => {
            event.paths.iter().cloned().map(VaultEvent::Remove).collect()
        }
        _ => Vec::new(),
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}

/// Apply one vault event to the task index.
///
/// A nonexistent path on upsert (event raced with a removal) scans to
/// an empty result and acts as a delete. A read failure logs, reports
/// via the error notification channel, and clears the file's records
/// for this pass.
pub fn apply_event(state: &Arc<MonitorState>, event: VaultEvent) {
    match event {
        VaultEvent::Upsert(path) => upsert(state, &path),
        VaultEvent::Remove(path) => {
            if is_markdown(&path) {
                state.delete_file(&path_key(&path, &state.config));
            }
        }
        VaultEvent::Rename { from, to } => {
            if is_markdown(&from) {
                state.delete_file(&path_key(&from, &state.config));
            }
            upsert(state, &to);
        }
    }
}

fn upsert(state: &Arc<MonitorState>, path: &Path) {
    if !is_markdown(path) {
        return;
    }
    let resolved = resolve_vault_path(path, &state.config);
    if resolved.is_dir() {
        return;
    }

    let key = path_key(path, &state.config);
    match scan_file(path, &state.config) {
        Ok(records) => state.replace_file(&key, records),
        Err(e) => {
            log::error!("{}", e);
            report_scan_error(state, &key, &e);
            // Zero records for this pass; old records must not linger.
            state.replace_file(&key, Vec::new());
        }
    }
}

/// Fire-and-forget error notification. Requires a running runtime and
/// configured delivery; silently skipped otherwise.
fn report_scan_error(state: &Arc<MonitorState>, path: &str, error: &MonitorError) {
    if !state.config.delivery_configured() {
        return;
    }
    let config = state.config.clone();
    let message = error.to_string();
    let filename = path.to_string();
    tokio::spawn(async move {
        telegram::send_error_notification(&config, &message, Some(&filename)).await;
    });
}

/// Start watching the vault root recursively.
///
/// Returns the watcher (drop it to stop watching and close the event
/// channel) and the handler task (finishes once the channel drains
/// after the watcher is dropped — stop then join).
pub fn start_watcher(
    state: Arc<MonitorState>,
) -> Result<(RecommendedWatcher, JoinHandle<()>), MonitorError> {
    let (tx, mut rx) = mpsc::channel::<VaultEvent>(WATCH_CHANNEL_SIZE);

    let mut watcher = RecommendedWatcher::new(
        move |result: Result<Event, notify::Error>| match result {
            Ok(event) => {
                for vault_event in map_event(&event) {
                    if tx.try_send(vault_event).is_err() {
                        log::warn!("Watcher channel full, dropping event");
                    }
                }
            }
            Err(e) => log::warn!("Watch error: {}", e),
        },
        notify::Config::default(),
    )?;

    watcher.watch(&state.config.vault_path, RecursiveMode::Recursive)?;
    log::info!("Watching {} for changes", state.config.vault_path.display());

    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            apply_event(&state, event);
        }
        log::info!("Watcher handler stopped");
    });

    Ok((watcher, handle))
}
