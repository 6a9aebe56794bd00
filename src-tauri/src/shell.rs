//! Glue between Tauri events and the shell controller.

use std::sync::{Mutex, TryLockError};

use tauri::{AppHandle, Manager};
use tracing::{debug, info, warn};

use crate::controller::ShellController;
use crate::error::ShellError;
use crate::host::Surface;
use crate::hotkey::TauriHotkeyHost;
use crate::menu::MenuAction;
use crate::service::Size;
use crate::session::Session;
use crate::tray;
use crate::window::TauriWindowHost;

pub type Controller = ShellController<TauriWindowHost, TauriHotkeyHost>;

/// Tauri managed state: the one controller instance, behind a lock so every
/// event runs to completion before the next one touches the session.
pub struct ShellState {
    controller: Mutex<Controller>,
}

impl ShellState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut Controller) -> T) -> T {
        let mut guard = match self.controller.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    /// Like `with`, but gives up instead of waiting. For window events the
    /// controller can trigger itself while it holds the lock.
    pub fn try_with<T>(&self, f: impl FnOnce(&mut Controller) -> T) -> Option<T> {
        let mut guard = match self.controller.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(f(&mut guard))
    }
}

/// Log the outcome of a user action and refresh the tray.
fn settle(app: &AppHandle, what: &str, result: Result<(), ShellError>, session: &Session) {
    let note = match result {
        Ok(()) => {
            debug!(
                "[shell] {} done, window {}",
                what,
                if session.is_visible() { "visible" } else { "hidden" }
            );
            None
        }
        Err(e) => {
            warn!("[shell] {} failed: {}", what, e);
            Some(e.to_string())
        }
    };
    tray::refresh(app, session, note.as_deref());
}

/// Run a tray or hotkey action and refresh the tray afterwards.
pub fn perform(app: &AppHandle, action: MenuAction) {
    let Some(state) = app.try_state::<ShellState>() else {
        warn!("[shell] {} ignored, shell not initialised", action.id());
        return;
    };
    let quit = action == MenuAction::Quit;
    let id = action.id();
    let (result, session) = state.with(|c| (c.apply(action), c.session().clone()));

    if quit {
        info!("[shell] quit requested");
        app.exit(0);
        return;
    }
    settle(app, &id, result, &session);
}

/// Dock icon clicked.
pub fn reopen(app: &AppHandle) {
    if let Some(state) = app.try_state::<ShellState>() {
        let (result, session) = state.with(|c| (c.reopen(), c.session().clone()));
        settle(app, "reopen", result, &session);
    }
}

/// A background reachability check found `url` unreachable.
pub fn navigation_failed(app: &AppHandle, surface: Surface, navigation: u64, url: &str, reason: &str) {
    let Some(state) = app.try_state::<ShellState>() else {
        return;
    };
    let (failure, session) = state.with(|c| {
        (
            c.on_navigation_failed(surface, navigation, url, reason),
            c.session().clone(),
        )
    });
    if let Some(e) = failure {
        tray::refresh(app, &session, Some(&e.to_string()));
    }
}

pub fn resized(app: &AppHandle, size: Size) {
    let Some(state) = app.try_state::<ShellState>() else {
        return;
    };
    if state.try_with(|c| c.on_resized(size)).is_none() {
        debug!("[shell] resize to {}x{} arrived mid-update", size.width, size.height);
    }
}

/// The main window was destroyed by the user or the OS.
pub fn window_closed(app: &AppHandle) {
    if let Some(state) = app.try_state::<ShellState>() {
        let session = state.with(|c| {
            c.on_closed();
            c.session().clone()
        });
        tray::refresh(app, &session, None);
    }
}

pub fn shutdown(app: &AppHandle) {
    if let Some(state) = app.try_state::<ShellState>() {
        state.with(Controller::shutdown);
    }
}
