//! Main and settings window management.
//!
//! The main window hosts the remote messenger page; the settings window is
//! a local page editing the preference store. Both are created here, and
//! the tray/lifecycle code funnels its show/hide/quit requests through the
//! helpers in this module.

use tauri::{command, AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;

use crate::app::{self, lifecycle, ShellState};
use crate::badge;
use crate::config::{keys, ConfigStore, ProxySettings};
use crate::error::{ShellError, ShellResult};

// Main window label (the hosted messenger page)
pub const MAIN_WINDOW_LABEL: &str = "main";

// Settings window label (local preferences page)
pub const SETTINGS_WINDOW_LABEL: &str = "settings";

/// The hosted page. Treated as opaque: the shell only consumes its window
/// title and injects presentation-only style rules.
const HOSTED_PAGE_URL: &str = "https://web.whatsapp.com";

/// Fixed override identity. The hosted service degrades or rejects clients
/// it does not recognize as a mainstream browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

// ============================================================================
// Main window
// ============================================================================

/// Create the main window from the current preference store: persisted
/// geometry, proxy settings and the configuration-derived style injection
/// are all applied at build time.
pub fn create_main_window(app: &AppHandle) -> ShellResult<WebviewWindow> {
    let state = app.state::<ShellState>();
    let (size, position, proxy, script) = {
        let config = state.config.read();
        let size = (
            config.get_f64(keys::WIDTH).unwrap_or(1000.0),
            config.get_f64(keys::HEIGHT).unwrap_or(720.0),
        );
        let position = match (config.get_f64(keys::POS_X), config.get_f64(keys::POS_Y)) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        };
        (
            size,
            position,
            ProxySettings::resolve(&config),
            injection_script(&config),
        )
    };

    let url: Url = HOSTED_PAGE_URL
        .parse()
        .map_err(|e| ShellError::WindowError(format!("bad hosted page URL: {}", e)))?;

    let opener_handle = app.clone();
    let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title("WhatsApp")
        .inner_size(size.0, size.1)
        .min_inner_size(600.0, 600.0)
        .user_agent(USER_AGENT)
        .on_navigation(move |url| {
            if allow_in_shell(url) {
                return true;
            }
            // The shell never renders arbitrary external sites inline.
            log::info!("handing off external navigation: {}", url);
            if let Err(e) = opener_handle.opener().open_url(url.as_str(), None::<&str>) {
                log::warn!("failed to open external URL: {}", e);
            }
            false
        })
        .on_document_title_changed(|window, title| {
            let count = badge::unread_count(&title);
            log::debug!("title changed ({:?} unread): {}", count, title);
            let renderer = window.state::<ShellState>().badge_renderer;
            renderer.apply(&window, count);
        });

    if let Some((x, y)) = position {
        builder = builder.position(x, y);
    }
    if let Some(script) = &script {
        builder = builder.initialization_script(script.as_str());
    }
    if let Some(proxy) = proxy {
        match proxy.webview_proxy_url() {
            Ok(proxy_url) => builder = builder.proxy_url(proxy_url),
            // A malformed endpoint degrades to a direct connection.
            Err(e) => log::warn!("ignoring proxy configuration: {}", e),
        }
    }

    Ok(builder.build()?)
}

/// Show, un-minimize and focus the main window. Used by the tray "Show"
/// entry, second-instance launches and macOS dock re-activation.
pub fn show_main_window(app: &AppHandle) {
    app::advance(app, lifecycle::on_show_requested);
}

/// Hide the main window to the tray, persisting geometry first.
pub fn hide_main_window(app: &AppHandle) {
    app::advance(app, lifecycle::on_hide_requested);
}

/// Unconditional quit: bypasses hide-on-close, closes the settings window,
/// flushes geometry and exits.
pub fn request_quit(app: &AppHandle) {
    let state = app.state::<ShellState>();
    state.set_force_close();
    app::advance(app, lifecycle::on_quit_requested);
    app.exit(0);
}

/// Tear down and rebuild the main window so session-level settings (proxy,
/// injected style rules) pick up the current configuration.
pub fn recreate_main_window(app: &AppHandle) -> ShellResult<()> {
    let state = app.state::<ShellState>();
    state.set_rebuilding(true);
    let result = (|| {
        if let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) {
            // Keep the new window where the old one was.
            app::apply_effects(app, &[lifecycle::Effect::PersistGeometry]);
            window.destroy()?;
        }
        *state.phase.lock() = lifecycle::Phase::Uninitialized;
        create_main_window(app)?;
        app::advance(app, lifecycle::on_created);
        Ok(())
    })();
    state.set_rebuilding(false);
    result
}

/// Whether a navigation target may render inside the shell.
fn allow_in_shell(url: &Url) -> bool {
    match url.scheme() {
        "about" => true,
        "http" | "https" => url
            .host_str()
            .map(|host| {
                host == "web.whatsapp.com"
                    || host == "whatsapp.com"
                    || host.ends_with(".whatsapp.com")
                    || host.ends_with(".whatsapp.net")
            })
            .unwrap_or(false),
        _ => false,
    }
}

// ============================================================================
// Configuration-derived style injection
// ============================================================================

/// Presentation-only rules derived from the display toggles. One-way and
/// fire-and-forget; nothing flows back from the page except its title.
fn css_rules(hide_avatars: bool, hide_previews: bool, thumb_size: u32) -> String {
    let mut css = String::new();
    if hide_avatars {
        css.push_str(".chat-avatar{display:none}");
    }
    if hide_previews {
        css.push_str(".chat-secondary .chat-status{z-index:-999}");
    }
    if thumb_size > 0 {
        css.push_str(&format!(
            ".image-thumb{{width:{0}px !important;height:{0}px !important}}\
             .image-thumb img.image-thumb-body{{width:auto !important;height:{0}px !important}}",
            thumb_size
        ));
    }
    css
}

/// Build the initialization script injecting the style rules once the
/// document is ready. `None` when no toggle asks for anything.
fn injection_script(config: &ConfigStore) -> Option<String> {
    let css = css_rules(
        config.get_flag(keys::HIDE_AVATARS),
        config.get_flag(keys::HIDE_PREVIEWS),
        config.get_f64(keys::THUMB_SIZE).unwrap_or(0.0) as u32,
    );
    if css.is_empty() {
        return None;
    }
    // JSON string literals are valid JS string literals.
    let literal = serde_json::Value::String(css).to_string();
    Some(format!(
        "(function(){{\
           var css={};\
           function apply(){{\
             var style=document.createElement('style');\
             style.textContent=css;\
             document.head.appendChild(style);\
           }}\
           if(document.readyState==='loading'){{\
             document.addEventListener('DOMContentLoaded',apply);\
           }}else{{apply();}}\
         }})();",
        literal
    ))
}

// ============================================================================
// Settings window
// ============================================================================

/// Open the settings window, or surface the existing one. At most one
/// instance exists at any time; the window registry clears the reference
/// when it closes, permitting exactly one re-open.
pub fn open_settings_window(app: &AppHandle) -> ShellResult<()> {
    if let Some(window) = app.get_webview_window(SETTINGS_WINDOW_LABEL) {
        let _ = window.show();
        let _ = window.set_focus();
        return Ok(());
    }

    let window = WebviewWindowBuilder::new(
        app,
        SETTINGS_WINDOW_LABEL,
        WebviewUrl::App("settings.html".into()),
    )
    .title("ChatIt Settings")
    .inner_size(500.0, 500.0)
    .center()
    .build()?;

    attach_settings_menu(&window)?;
    Ok(())
}

/// Attach the accelerator-only menu (close, reload, devtools in debug
/// builds) and hide the menu bar; the entries stay reachable through their
/// shortcuts.
#[cfg(not(target_os = "macos"))]
fn attach_settings_menu(window: &WebviewWindow) -> ShellResult<()> {
    use tauri::menu::{Menu, MenuItem};

    let app = window.app_handle();
    let menu = Menu::new(app)?;
    menu.append(&MenuItem::with_id(
        app,
        "settings-close",
        "Close",
        true,
        Some("Esc"),
    )?)?;
    menu.append(&MenuItem::with_id(
        app,
        "settings-reload",
        "Reload settings view",
        true,
        Some("CmdOrCtrl+R"),
    )?)?;
    #[cfg(debug_assertions)]
    menu.append(&MenuItem::with_id(
        app,
        "settings-devtools",
        "Toggle DevTools",
        true,
        Some("Alt+CmdOrCtrl+O"),
    )?)?;

    window.on_menu_event(|window, event| {
        let settings = window.app_handle().get_webview_window(SETTINGS_WINDOW_LABEL);
        let Some(settings) = settings else { return };
        match event.id.as_ref() {
            "settings-close" => {
                let _ = settings.close();
            }
            "settings-reload" => {
                let _ = settings.eval("window.location.reload()");
            }
            #[cfg(debug_assertions)]
            "settings-devtools" => {
                if settings.is_devtools_open() {
                    settings.close_devtools();
                } else {
                    settings.open_devtools();
                }
            }
            _ => {}
        }
    });

    window.set_menu(menu)?;
    window.hide_menu()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn attach_settings_menu(_window: &WebviewWindow) -> ShellResult<()> {
    // Window menus are app-wide on macOS; the standard Cmd+W/Cmd+R bindings
    // already cover close and reload there.
    Ok(())
}

/// Open (or focus) the settings window from the frontend.
#[command]
pub async fn open_settings(app: AppHandle) -> ShellResult<()> {
    open_settings_window(&app)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        s.parse().unwrap()
    }

    #[test]
    fn test_hosted_origins_stay_inline() {
        assert!(allow_in_shell(&url("https://web.whatsapp.com/")));
        assert!(allow_in_shell(&url("https://static.whatsapp.net/asset.js")));
        assert!(allow_in_shell(&url("https://whatsapp.com/")));
        assert!(allow_in_shell(&url("about:blank")));
    }

    #[test]
    fn test_external_sites_are_suppressed() {
        assert!(!allow_in_shell(&url("https://example.com/")));
        assert!(!allow_in_shell(&url("https://evilwhatsapp.com/")));
        assert!(!allow_in_shell(&url("ftp://web.whatsapp.com/")));
        assert!(!allow_in_shell(&url("https://whatsapp.com.evil.example/")));
    }

    #[test]
    fn test_css_rules_follow_toggles() {
        assert_eq!(css_rules(false, false, 0), "");

        let avatars_only = css_rules(true, false, 0);
        assert!(avatars_only.contains(".chat-avatar"));
        assert!(!avatars_only.contains(".chat-status"));

        let everything = css_rules(true, true, 64);
        assert!(everything.contains(".chat-avatar"));
        assert!(everything.contains(".chat-status"));
        assert!(everything.contains("width:64px"));
    }

    #[test]
    fn test_injection_script_is_none_without_toggles() {
        let config = ConfigStore::new("unused.json");
        assert_eq!(injection_script(&config), None);
    }

    #[test]
    fn test_injection_script_embeds_escaped_css() {
        let mut config = ConfigStore::new("unused.json");
        config.set(keys::HIDE_AVATARS, true);
        config.set(keys::THUMB_SIZE, 80);

        let script = injection_script(&config).unwrap();
        assert!(script.contains("DOMContentLoaded"));
        assert!(script.contains(".chat-avatar{display:none}"));
        assert!(script.contains("height:80px"));
    }
}
