//! System tray setup and visibility synchronization.
//!
//! The tray context menu mirrors main-window visibility: exactly one of
//! Show/Hide is present at any time. Menu state is computed as a pure value
//! and the whole context menu is rebuilt and re-assigned after every
//! mutation, because not every platform reflects in-place menu changes on
//! an already-published tray menu.

use std::sync::Mutex;

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager,
};

use crate::commands;
use crate::error::{ShellError, ShellResult};

const TRAY_ID: &str = "main-tray";

/// Visibility flags for the two toggling context-menu entries.
///
/// Invariant: the flags are always complementary, and reflect the current
/// window visibility (`show` is offered exactly when the window is hidden).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayMenuState {
    pub show_visible: bool,
    pub hide_visible: bool,
}

impl TrayMenuState {
    /// The menu state matching a given window visibility.
    pub fn synced_to(window_visible: bool) -> Self {
        Self {
            show_visible: !window_visible,
            hide_visible: window_visible,
        }
    }

    /// The main window starts out visible.
    pub fn initial() -> Self {
        Self::synced_to(true)
    }
}

/// Holds the tray icon and the menu state last published to it.
pub struct TrayState {
    tray: TrayIcon<tauri::Wry>,
    pub menu_state: TrayMenuState,
}

/// Build the context menu for a given menu state. Only the entries whose
/// visibility flag is set are included; Quit is always there.
fn build_menu(app: &AppHandle, state: TrayMenuState) -> ShellResult<Menu<tauri::Wry>> {
    let menu = Menu::new(app)?;
    if state.show_visible {
        menu.append(&MenuItem::with_id(app, "show", "Show", true, None::<&str>)?)?;
    }
    if state.hide_visible {
        menu.append(&MenuItem::with_id(app, "hide", "Hide", true, None::<&str>)?)?;
    }
    menu.append(&PredefinedMenuItem::separator(app)?)?;
    menu.append(&MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?)?;
    Ok(menu)
}

/// Create the tray icon with its initial context menu and event handlers.
fn setup_tray(app: &App) -> ShellResult<TrayState> {
    let menu_state = TrayMenuState::initial();
    let menu = build_menu(app.handle(), menu_state)?;

    let tray_icon = Image::from_bytes(include_bytes!("../../icons/tray.png"))
        .map_err(|e| ShellError::TrayError(format!("failed to load tray icon: {}", e)))?;

    let tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(tray_icon)
        .tooltip("ChatIt")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(move |app, event| match event.id.as_ref() {
            "show" => commands::window::show_main_window(app),
            "hide" => commands::window::hide_main_window(app),
            // Quit bypasses hide-on-close entirely.
            "quit" => commands::window::request_quit(app),
            _ => {}
        })
        .on_tray_icon_event(|tray, event| {
            // Left-click restores the window. Some Linux status areas never
            // deliver click events, which is what the Show menu entry is for.
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                commands::window::show_main_window(tray.app_handle());
            }
        })
        .build(app)?;

    Ok(TrayState { tray, menu_state })
}

/// Initialize the system tray and register it with the app state.
///
/// This is called from the app setup hook.
pub fn init(app: &App) -> ShellResult<()> {
    let tray_state = setup_tray(app)?;
    app.manage(Mutex::new(tray_state));
    Ok(())
}

/// Recompute the menu state for `is_visible` and re-publish the context
/// menu on the tray icon.
pub fn sync_to_visibility(app: &AppHandle, is_visible: bool) {
    let Some(state) = app.try_state::<Mutex<TrayState>>() else {
        log::warn!("tray sync requested before tray init");
        return;
    };
    let mut tray_state = match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    tray_state.menu_state = TrayMenuState::synced_to(is_visible);

    match build_menu(app, tray_state.menu_state) {
        Ok(menu) => {
            if let Err(e) = tray_state.tray.set_menu(Some(menu)) {
                log::warn!("failed to re-publish tray menu: {}", e);
            }
        }
        Err(e) => log::warn!("failed to rebuild tray menu: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_always_complementary() {
        for visible in [true, false] {
            let state = TrayMenuState::synced_to(visible);
            assert_ne!(state.show_visible, state.hide_visible);
        }
    }

    #[test]
    fn test_flags_reflect_window_visibility() {
        let visible = TrayMenuState::synced_to(true);
        assert!(!visible.show_visible);
        assert!(visible.hide_visible);

        let hidden = TrayMenuState::synced_to(false);
        assert!(hidden.show_visible);
        assert!(!hidden.hide_visible);
    }

    #[test]
    fn test_initial_state_offers_hide() {
        // Window starts visible, so the menu offers Hide.
        assert_eq!(TrayMenuState::initial(), TrayMenuState::synced_to(true));
    }

    #[test]
    fn test_sync_is_driven_by_current_visibility_not_history() {
        // Repeated syncs to the same visibility are stable; alternating
        // syncs always land on the state matching the argument.
        let mut state = TrayMenuState::initial();
        for visible in [false, false, true, false, true, true] {
            state = TrayMenuState::synced_to(visible);
            assert_eq!(state.hide_visible, visible);
            assert_eq!(state.show_visible, !visible);
        }
    }
}
