//! Continuous monitoring loop.
//!
//! Wires the pieces together: initial full scan, the filesystem
//! watcher, and the notification scheduler. Runs until ctrl-c; on
//! shutdown the watcher is stopped and joined before the loop returns,
//! so no index mutation happens after.

use std::sync::Arc;

use crate::config::Config;
use crate::error::MonitorError;
use crate::scanner::scan_vault;
use crate::scheduler;
use crate::state::MonitorState;
use crate::watcher::start_watcher;

pub async fn run(config: Config) -> Result<(), MonitorError> {
    let state = Arc::new(MonitorState::new(config));

    // Populate the index before watching so the first tick sees a full
    // picture instead of an empty one.
    let records = scan_vault(&state.config);
    state.rebuild_index(records);

    let (watcher, handler) = start_watcher(state.clone())?;
    let scheduler_handle = tokio::spawn(scheduler::run(state.clone()));

    log::info!(
        "Monitoring started: {} ({} tasks)",
        state.config.vault_path.display(),
        state.task_count()
    );

    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Monitoring stopped by user request"),
        Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
    }

    scheduler_handle.abort();
    // Dropping the watcher stops the notify backend and closes the
    // event channel; the handler drains what is queued and exits.
    drop(watcher);
    let _ = handler.await;

    Ok(())
}
