//! Tray icon and its menu.

use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager, Runtime,
};
use tracing::warn;

use crate::menu::{self, MenuAction};
use crate::session::Session;
use crate::shell;

pub const TRAY_ID: &str = "quick-ai";

fn tooltip(session: &Session, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("Quick AI Desktop - {note}"),
        None if session.split_view => format!(
            "Quick AI Desktop - {} | {}",
            session.left_service, session.right_service
        ),
        None => format!("Quick AI Desktop - {}", session.active_service),
    }
}

pub fn build_menu<R: Runtime, M: Manager<R>>(app: &M, session: &Session) -> tauri::Result<Menu<R>> {
    let menu = Menu::new(app)?;
    let toggle = MenuItem::with_id(
        app,
        MenuAction::ToggleSingle.id(),
        menu::toggle_label(session),
        true,
        None::<&str>,
    )?;
    let split = MenuItem::with_id(
        app,
        MenuAction::ToggleSplit.id(),
        menu::split_label(session),
        true,
        None::<&str>,
    )?;
    menu.append(&toggle)?;
    menu.append(&split)?;
    menu.append(&PredefinedMenuItem::separator(app)?)?;

    for group in menu::groups(session) {
        let submenu = Submenu::with_id(app, format!("group:{}", group.title), &group.title, group.enabled)?;
        for entry in group.entries {
            let item = CheckMenuItem::with_id(
                app,
                entry.action.id(),
                &entry.label,
                true,
                entry.checked,
                None::<&str>,
            )?;
            submenu.append(&item)?;
        }
        menu.append(&submenu)?;
    }

    menu.append(&PredefinedMenuItem::separator(app)?)?;
    let quit = MenuItem::with_id(app, MenuAction::Quit.id(), "Quit", true, None::<&str>)?;
    menu.append(&quit)?;
    Ok(menu)
}

pub fn install(app: &App, session: &Session, note: Option<&str>) -> tauri::Result<TrayIcon> {
    let tray_menu = build_menu(app, session)?;

    let mut builder = TrayIconBuilder::with_id(TRAY_ID)
        .icon_as_template(true)
        .tooltip(tooltip(session, note))
        .menu(&tray_menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            // submenu titles and separators carry no action
            if let Some(action) = MenuAction::parse(event.id.as_ref()) {
                shell::perform(app, action);
            }
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                shell::perform(tray.app_handle(), MenuAction::ToggleSingle);
            }
        });
    if let Some(icon) = app.default_window_icon() {
        builder = builder.icon(icon.clone());
    }
    builder.build(app)
}

/// Rebuild the menu so radio checks and labels match the session.
pub fn refresh(app: &AppHandle, session: &Session, note: Option<&str>) {
    let Some(tray) = app.tray_by_id(TRAY_ID) else {
        return;
    };
    match build_menu(app, session) {
        Ok(menu) => {
            if let Err(e) = tray.set_menu(Some(menu)) {
                warn!("[tray] could not replace menu: {}", e);
            }
        }
        Err(e) => warn!("[tray] could not build menu: {}", e),
    }
    if let Err(e) = tray.set_tooltip(Some(tooltip(session, note))) {
        warn!("[tray] could not set tooltip: {}", e);
    }
}
