//! ChatIt: a desktop shell hosting WhatsApp Web in a native window.
//!
//! The shell owns window lifecycle (hide-instead-of-quit where the platform
//! expects it), a tray icon whose menu mirrors window visibility, unread
//! badges derived from the hosted page's title, and a persisted preference
//! store covering geometry, proxy and display toggles.

use tauri::Manager;

pub mod app;
pub mod badge;
pub mod commands;
pub mod config;
pub mod error;
pub mod platform;

use badge::BadgeRenderer;
use config::ConfigStore;
use platform::Platform;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // A second launch never creates a second window: restore and
            // focus the existing one, then the second process exits.
            log::info!("second instance launched; restoring existing window");
            commands::window::show_main_window(app);
        }))
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            commands::settings::get_preferences,
            commands::settings::set_preference,
            commands::settings::unset_preference,
            commands::settings::save_preferences,
            commands::settings::reload_shell,
            commands::window::open_settings,
        ])
        .on_window_event(app::events::handle_window_event)
        .setup(|app| {
            let config_dir = app.path().app_config_dir()?;
            std::fs::create_dir_all(&config_dir)?;

            let mut config = ConfigStore::new(config_dir.join("settings.json"));
            config.load();

            let renderer = BadgeRenderer::for_platform(Platform::current());
            app.manage(app::ShellState::new(config, renderer));

            // Tray first: the creation transition re-publishes its menu.
            app::tray::init(app)?;
            commands::window::create_main_window(app.handle())?;
            app::advance(app.handle(), app::lifecycle::on_created);

            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::events::handle_run_event);
}
