//! Application shell: lifecycle state machine, event handlers, tray.

pub mod events;
pub mod lifecycle;
pub mod tray;

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use tauri::{AppHandle, Manager, WebviewWindow};

use crate::badge::BadgeRenderer;
use crate::commands::window::{MAIN_WINDOW_LABEL, SETTINGS_WINDOW_LABEL};
use crate::config::{keys, ConfigStore};
use self::lifecycle::{Effect, Phase};

/// Top-level shell state, owned by the Tauri app and passed to
/// collaborators by reference. The single writer of `force_close` is the
/// quit path; everything else only reads it.
pub struct ShellState {
    pub config: RwLock<ConfigStore>,
    pub phase: Mutex<Phase>,
    pub force_close: AtomicBool,
    /// Set while the main window is torn down and rebuilt to re-apply
    /// session settings; the exit handler must not treat that teardown as
    /// the last window closing.
    pub rebuilding: AtomicBool,
    pub badge_renderer: BadgeRenderer,
}

impl ShellState {
    pub fn new(config: ConfigStore, badge_renderer: BadgeRenderer) -> Self {
        Self {
            config: RwLock::new(config),
            phase: Mutex::new(Phase::Uninitialized),
            force_close: AtomicBool::new(false),
            rebuilding: AtomicBool::new(false),
            badge_renderer,
        }
    }

    pub fn force_close(&self) -> bool {
        self.force_close.load(Ordering::SeqCst)
    }

    pub fn set_force_close(&self) {
        self.force_close.store(true, Ordering::SeqCst);
    }

    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::SeqCst)
    }

    pub fn set_rebuilding(&self, value: bool) {
        self.rebuilding.store(value, Ordering::SeqCst);
    }
}

/// Run one lifecycle transition and execute the effects it returns.
///
/// The returned effect list lets event callbacks inspect decisions that only
/// they can act on (`PreventClose` needs the close api object).
pub fn advance(
    app: &AppHandle,
    transition: impl FnOnce(Phase) -> (Phase, Vec<Effect>),
) -> Vec<Effect> {
    let state = app.state::<ShellState>();
    let effects = {
        let mut phase = state.phase.lock();
        let (next, effects) = transition(*phase);
        log::debug!("lifecycle: {:?} -> {:?} via {:?}", *phase, next, effects);
        *phase = next;
        effects
    };
    apply_effects(app, &effects);
    effects
}

/// Execute transition effects against the live window, tray and store.
/// `PreventClose` is intentionally skipped here; only the close-event
/// callback holds the api object it needs.
pub fn apply_effects(app: &AppHandle, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::PreventClose => {}
            Effect::HideWindow => with_main_window(app, |w| w.hide()),
            Effect::UnminimizeWindow => with_main_window(app, |w| w.unminimize()),
            Effect::ShowWindow => with_main_window(app, |w| w.show()),
            Effect::FocusWindow => with_main_window(app, |w| w.set_focus()),
            Effect::SyncTray { visible } => tray::sync_to_visibility(app, *visible),
            Effect::PersistGeometry => persist_geometry(app),
            Effect::CloseSettingsWindow => {
                if let Some(settings) = app.get_webview_window(SETTINGS_WINDOW_LABEL) {
                    let _ = settings.close();
                }
            }
        }
    }
}

fn with_main_window(app: &AppHandle, f: impl FnOnce(&WebviewWindow) -> tauri::Result<()>) {
    match app.get_webview_window(MAIN_WINDOW_LABEL) {
        Some(window) => {
            if let Err(e) = f(&window) {
                log::warn!("main window operation failed: {}", e);
            }
        }
        None => log::warn!("main window not found while applying effect"),
    }
}

/// Write the current main-window bounds into the store and flush it to
/// disk. Runs on every close transition, hide and destroy alike, so a
/// later show (or the next launch) restores the same geometry.
fn persist_geometry(app: &AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    let (position, size) = match (window.outer_position(), window.inner_size()) {
        (Ok(position), Ok(size)) => (position, size),
        _ => {
            log::warn!("could not read window bounds; geometry not persisted");
            return;
        }
    };

    let state = app.state::<ShellState>();
    let mut config = state.config.write();
    config.set(keys::POS_X, position.x);
    config.set(keys::POS_Y, position.y);
    config.set(keys::WIDTH, size.width);
    config.set(keys::HEIGHT, size.height);
    config.save();
}
