//! Main-window lifecycle state machine.
//!
//! OS window events arrive with platform-divergent semantics (closing the
//! last window quits on Windows but must hide elsewhere; macOS re-activates
//! through the dock; the tray can show or hide at any time). The transitions
//! here are pure: they take the current phase plus the relevant inputs and
//! return the next phase and an ordered list of effects for the caller to
//! execute against the live window, tray and store. That keeps the policy
//! unit-testable without a running event loop.

use crate::platform::Platform;

/// Where the main window is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    OpenVisible,
    OpenHidden,
    Destroyed,
}

/// Side effects a transition asks the executor to perform, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Suppress the default destructive close.
    PreventClose,
    HideWindow,
    UnminimizeWindow,
    ShowWindow,
    FocusWindow,
    /// Re-publish the tray context menu for the given window visibility.
    SyncTray { visible: bool },
    /// Write current bounds to the store and flush it to disk.
    PersistGeometry,
    /// Close the settings window if one exists.
    CloseSettingsWindow,
}

/// The window exists and is on screen.
pub fn on_created(phase: Phase) -> (Phase, Vec<Effect>) {
    match phase {
        Phase::Uninitialized => (Phase::OpenVisible, vec![Effect::SyncTray { visible: true }]),
        other => (other, vec![]),
    }
}

/// The user (or the OS) asked to close the main window.
///
/// With the force-close flag unset on a hide-on-close platform this becomes
/// a hide; geometry is flushed before the transition completes either way.
/// On the terminal path the settings window goes first, then geometry, then
/// the close proceeds unimpeded.
pub fn on_close_requested(
    phase: Phase,
    platform: Platform,
    force_close: bool,
) -> (Phase, Vec<Effect>) {
    match phase {
        Phase::OpenVisible | Phase::OpenHidden => {
            if force_close || platform.close_is_terminal() {
                (
                    Phase::Destroyed,
                    vec![Effect::CloseSettingsWindow, Effect::PersistGeometry],
                )
            } else {
                (
                    Phase::OpenHidden,
                    vec![
                        Effect::PreventClose,
                        Effect::PersistGeometry,
                        Effect::HideWindow,
                        Effect::SyncTray { visible: false },
                    ],
                )
            }
        }
        other => (other, vec![]),
    }
}

/// A show request: tray "Show", a second-instance launch, or macOS
/// re-activation with no visible windows.
pub fn on_show_requested(phase: Phase) -> (Phase, Vec<Effect>) {
    match phase {
        Phase::OpenVisible | Phase::OpenHidden => (
            Phase::OpenVisible,
            vec![
                Effect::UnminimizeWindow,
                Effect::ShowWindow,
                Effect::FocusWindow,
                Effect::SyncTray { visible: true },
            ],
        ),
        other => (other, vec![]),
    }
}

/// A hide request from the tray "Hide" item.
pub fn on_hide_requested(phase: Phase) -> (Phase, Vec<Effect>) {
    match phase {
        Phase::OpenVisible => (
            Phase::OpenHidden,
            vec![
                Effect::PersistGeometry,
                Effect::HideWindow,
                Effect::SyncTray { visible: false },
            ],
        ),
        other => (other, vec![]),
    }
}

/// An unconditional quit (tray "Quit"). Bypasses hide-on-close but still
/// closes the settings window and flushes geometry before the process exits.
pub fn on_quit_requested(phase: Phase) -> (Phase, Vec<Effect>) {
    match phase {
        Phase::OpenVisible | Phase::OpenHidden => (
            Phase::Destroyed,
            vec![Effect::CloseSettingsWindow, Effect::PersistGeometry],
        ),
        Phase::Uninitialized => (Phase::Destroyed, vec![]),
        Phase::Destroyed => (Phase::Destroyed, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_without_force_hides_instead_of_destroying() {
        for platform in [Platform::MacOs, Platform::Linux] {
            let (phase, effects) = on_close_requested(Phase::OpenVisible, platform, false);
            assert_eq!(phase, Phase::OpenHidden);
            assert!(effects.contains(&Effect::PreventClose));
            assert!(effects.contains(&Effect::HideWindow));
            assert!(!effects.contains(&Effect::CloseSettingsWindow));
        }
    }

    #[test]
    fn test_geometry_persists_before_the_hide() {
        let (_, effects) = on_close_requested(Phase::OpenVisible, Platform::Linux, false);
        let persist = effects
            .iter()
            .position(|e| *e == Effect::PersistGeometry)
            .unwrap();
        let hide = effects.iter().position(|e| *e == Effect::HideWindow).unwrap();
        assert!(persist < hide);
    }

    #[test]
    fn test_close_on_windows_is_terminal() {
        let (phase, effects) = on_close_requested(Phase::OpenVisible, Platform::Windows, false);
        assert_eq!(phase, Phase::Destroyed);
        assert!(!effects.contains(&Effect::PreventClose));
        // Settings window goes first, then the geometry flush.
        assert_eq!(effects[0], Effect::CloseSettingsWindow);
        assert_eq!(effects[1], Effect::PersistGeometry);
    }

    #[test]
    fn test_forced_close_is_terminal_everywhere() {
        for platform in [Platform::MacOs, Platform::Linux, Platform::Windows] {
            let (phase, effects) = on_close_requested(Phase::OpenVisible, platform, true);
            assert_eq!(phase, Phase::Destroyed);
            assert!(!effects.contains(&Effect::PreventClose));
            assert!(effects.contains(&Effect::PersistGeometry));
        }
    }

    #[test]
    fn test_hide_then_show_round_trip() {
        let (hidden, _) = on_close_requested(Phase::OpenVisible, Platform::MacOs, false);
        let (shown, effects) = on_show_requested(hidden);
        assert_eq!(shown, Phase::OpenVisible);
        assert!(effects.contains(&Effect::ShowWindow));
        assert!(effects.contains(&Effect::FocusWindow));
        assert!(effects.contains(&Effect::SyncTray { visible: true }));
        // Nothing on the show path touches geometry, so the restored window
        // keeps the bounds persisted at hide time.
        assert!(!effects.contains(&Effect::PersistGeometry));
    }

    #[test]
    fn test_show_restores_minimized_windows_too() {
        let (_, effects) = on_show_requested(Phase::OpenVisible);
        let unminimize = effects
            .iter()
            .position(|e| *e == Effect::UnminimizeWindow)
            .unwrap();
        let show = effects.iter().position(|e| *e == Effect::ShowWindow).unwrap();
        assert!(unminimize < show);
    }

    #[test]
    fn test_tray_sync_follows_every_visibility_transition() {
        let (_, hide_effects) = on_close_requested(Phase::OpenVisible, Platform::Linux, false);
        assert!(hide_effects.contains(&Effect::SyncTray { visible: false }));

        let (_, show_effects) = on_show_requested(Phase::OpenHidden);
        assert!(show_effects.contains(&Effect::SyncTray { visible: true }));

        let (_, tray_hide_effects) = on_hide_requested(Phase::OpenVisible);
        assert!(tray_hide_effects.contains(&Effect::SyncTray { visible: false }));
    }

    #[test]
    fn test_quit_flushes_geometry_and_closes_settings_first() {
        let (phase, effects) = on_quit_requested(Phase::OpenHidden);
        assert_eq!(phase, Phase::Destroyed);
        assert_eq!(
            effects,
            vec![Effect::CloseSettingsWindow, Effect::PersistGeometry]
        );
    }

    #[test]
    fn test_destroyed_is_a_sink() {
        assert_eq!(
            on_close_requested(Phase::Destroyed, Platform::Linux, false),
            (Phase::Destroyed, vec![])
        );
        assert_eq!(on_show_requested(Phase::Destroyed), (Phase::Destroyed, vec![]));
        assert_eq!(on_hide_requested(Phase::Destroyed), (Phase::Destroyed, vec![]));
    }

    #[test]
    fn test_creation_leaves_uninitialized_exactly_once() {
        let (phase, effects) = on_created(Phase::Uninitialized);
        assert_eq!(phase, Phase::OpenVisible);
        assert_eq!(effects, vec![Effect::SyncTray { visible: true }]);
        // A second creation event is ignored.
        assert_eq!(on_created(phase), (Phase::OpenVisible, vec![]));
    }
}
