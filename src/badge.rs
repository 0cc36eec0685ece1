//! Unread-count badge extraction and rendering.
//!
//! The hosted page signals unread messages only through its document title
//! (free text with an optional `(N)` count, e.g. `"WhatsApp (3)"`). The
//! extraction is shared; rendering diverges per platform behind a strategy
//! selected once at startup.

use lazy_static::lazy_static;
use regex::Regex;
#[cfg(windows)]
use tauri::{image::Image, UserAttentionType};
use tauri::WebviewWindow;

use crate::platform::Platform;

lazy_static! {
    /// First parenthesized digit run anywhere in the title.
    static ref UNREAD_RE: Regex = Regex::new(r"\((\d+)\)").expect("invalid unread-count regex");
}

/// Extract the unread count from a window title.
///
/// Returns `None` when the title carries no parseable count; never panics,
/// including on malformed parentheses or counts too large for `u32`.
pub fn unread_count(title: &str) -> Option<u32> {
    UNREAD_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Platform-specific badge presentation, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRenderer {
    /// macOS: dock badge text.
    Dock,
    /// Windows: taskbar overlay icon, plus a frame flash while unfocused.
    Overlay,
    /// Linux and everything else: no native affordance, do nothing.
    Noop,
}

impl BadgeRenderer {
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => BadgeRenderer::Dock,
            Platform::Windows => BadgeRenderer::Overlay,
            Platform::Linux | Platform::Other => BadgeRenderer::Noop,
        }
    }

    /// Apply `count` to the window. `None` clears whatever badge is showing.
    pub fn apply(self, window: &WebviewWindow, count: Option<u32>) {
        match self {
            BadgeRenderer::Dock => {
                if let Err(e) = window.set_badge_count(count.map(i64::from)) {
                    log::warn!("failed to set dock badge: {}", e);
                }
            }
            BadgeRenderer::Overlay => {
                #[cfg(windows)]
                apply_overlay(window, count);
                #[cfg(not(windows))]
                let _ = (window, count);
            }
            BadgeRenderer::Noop => {}
        }
    }
}

/// Overlay icon + frame flash for the Windows taskbar.
#[cfg(windows)]
fn apply_overlay(window: &WebviewWindow, count: Option<u32>) {
    match count {
        Some(n) if n > 0 => {
            match Image::from_bytes(include_bytes!("../icons/badge.png")) {
                Ok(badge) => {
                    if let Err(e) = window.set_overlay_icon(Some(badge)) {
                        log::warn!("failed to set overlay icon: {}", e);
                    }
                }
                Err(e) => log::warn!("failed to load badge image: {}", e),
            }
            // Flash only while the user is looking elsewhere.
            if !window.is_focused().unwrap_or(true) {
                let _ = window.request_user_attention(Some(UserAttentionType::Informational));
            }
        }
        _ => {
            if let Err(e) = window.set_overlay_icon(None) {
                log::warn!("failed to clear overlay icon: {}", e);
            }
        }
    }
}
