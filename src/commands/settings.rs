//! IPC surface for the settings window.
//!
//! The settings page's only contract with the shell is read/write access to
//! the preference store; these commands are that access.

use serde_json::{Map, Value};
use tauri::{command, AppHandle, State};

use crate::app::ShellState;
use crate::commands::window;
use crate::error::ShellResult;

/// Snapshot of the whole preference set.
#[command]
pub fn get_preferences(state: State<'_, ShellState>) -> Map<String, Value> {
    state.config.read().all()
}

/// Write one preference in place.
#[command]
pub fn set_preference(state: State<'_, ShellState>, key: String, value: Value) {
    log::debug!("[SETTINGS] set {} = {}", key, value);
    state.config.write().set(&key, value);
}

/// Remove one preference if present.
#[command]
pub fn unset_preference(state: State<'_, ShellState>, key: String) {
    log::debug!("[SETTINGS] unset {}", key);
    state.config.write().unset(&key);
}

/// Flush the preference set to disk. Write failures follow the store's
/// swallow-and-report policy.
#[command]
pub fn save_preferences(state: State<'_, ShellState>) {
    state.config.read().save();
}

/// Rebuild the main window so session-level settings (proxy, injected
/// style rules) are re-applied from the current configuration.
#[command]
pub async fn reload_shell(app: AppHandle) -> ShellResult<()> {
    window::recreate_main_window(&app)
}
