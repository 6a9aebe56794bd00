mod commands;
mod config;
mod controller;
mod error;
mod focus;
mod host;
mod hotkey;
mod menu;
mod pages;
mod service;
mod session;
mod shell;
mod shortcut;
mod split;
mod tray;
mod window;

use tauri::http::{header::CONTENT_TYPE, HeaderValue, Response};
use tauri::{Manager, RunEvent, WindowEvent};
use tracing::{error, info};

use config::ShellConfig;
use controller::ShellController;
use hotkey::TauriHotkeyHost;
use service::Size;
use shell::ShellState;
use window::{PageStore, TauriWindowHost, MAIN_WINDOW, PAGE_SCHEME};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    config::init_logging();

    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("[shell] config failed: {:#}", e);
            return;
        }
    };
    info!(
        "[shell] starting with {} at {} ({})",
        config.service,
        config.window_size.id(),
        config.visibility_mode.id()
    );

    let pages = PageStore::default();
    let served = pages.clone();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .register_uri_scheme_protocol(PAGE_SCHEME, move |_ctx, request| {
            let mut response = Response::new(served.serve(request.uri().path()).into_bytes());
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
            response
        })
        .setup(move |app| {
            let handle = app.handle().clone();
            let controller = ShellController::new(
                config.into_session(),
                TauriWindowHost::new(handle.clone(), pages),
                TauriHotkeyHost::new(handle),
            );
            app.manage(ShellState::new(controller));

            let state = app.state::<ShellState>();
            let (failures, session) = state.with(|c| (c.start(), c.session().clone()));
            let note = failures.first().map(ToString::to_string);
            tray::install(app, &session, note.as_deref())?;
            info!("[shell] ready, {} in the menubar", session.active_service);
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW {
                return;
            }
            match event {
                WindowEvent::Resized(size) => {
                    let logical = size.to_logical::<u32>(window.scale_factor().unwrap_or(1.0));
                    let size = Size {
                        width: logical.width,
                        height: logical.height,
                    };
                    shell::resized(window.app_handle(), size);
                }
                WindowEvent::Destroyed => shell::window_closed(window.app_handle()),
                _ => {}
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::focus_acquired,
            commands::split_divider,
            commands::split_focus,
            commands::split_key,
            commands::split_reload,
        ])
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            error!("[shell] could not start: {}", e);
            return;
        }
    };

    app.run(|app, event| match event {
        // closing the last window must not end a menubar app
        RunEvent::ExitRequested { api, code, .. } if code.is_none() => api.prevent_exit(),
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => shell::reopen(app),
        RunEvent::Exit => {
            shell::shutdown(app);
            info!("[shell] exited");
        }
        _ => {}
    });
}
