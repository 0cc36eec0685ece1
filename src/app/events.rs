//! Window and application run-event handlers.
//!
//! These are the thin adapters between the host event loop and the pure
//! lifecycle transitions in [`crate::app::lifecycle`].

use tauri::{AppHandle, Manager, RunEvent, Window, WindowEvent};

use crate::app::{self, lifecycle, ShellState};
use crate::commands::window::MAIN_WINDOW_LABEL;
use crate::platform::Platform;

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook. Only the
/// main window's close request carries policy; the settings window closes
/// normally and its reference clears itself out of the window registry.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    if let WindowEvent::CloseRequested { api, .. } = event {
        if window.label() != MAIN_WINDOW_LABEL {
            return;
        }
        let app = window.app_handle();
        let force_close = app.state::<ShellState>().force_close();

        let effects = app::advance(app, |phase| {
            lifecycle::on_close_requested(phase, Platform::current(), force_close)
        });
        if effects.contains(&lifecycle::Effect::PreventClose) {
            api.prevent_close();
        }
    }
}

/// Handle application run events.
///
/// This is passed to `App::run` after the builder is assembled.
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        // Dock click with no visible windows re-opens the main window.
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            crate::commands::window::show_main_window(app);
        }
        RunEvent::ExitRequested { code, api, .. } => {
            let state = app.state::<ShellState>();
            if code.is_none() && state.is_rebuilding() {
                // The main window is being torn down and rebuilt to
                // re-apply session settings; keep the process running.
                api.prevent_exit();
            } else {
                // Quit sequence has begun: any close request that still
                // arrives must be allowed to destroy the window, and the
                // quit transition flushes geometry if it has not happened
                // yet (no-op once the phase is already Destroyed).
                state.set_force_close();
                app::advance(app, lifecycle::on_quit_requested);
            }
        }
        _ => {}
    }
}
