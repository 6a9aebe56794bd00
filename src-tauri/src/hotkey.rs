use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};
use tracing::{debug, warn};

use crate::error::ShellError;
use crate::host::HotkeyHost;
use crate::shell;
use crate::shortcut::{Combo, ShortcutSlot};

/// Global shortcuts through `tauri-plugin-global-shortcut`.
pub struct TauriHotkeyHost {
    app: AppHandle,
}

impl TauriHotkeyHost {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl HotkeyHost for TauriHotkeyHost {
    fn register(&mut self, combo: &Combo, slot: ShortcutSlot) -> Result<(), ShellError> {
        self.app
            .global_shortcut()
            .on_shortcut(combo.shortcut(), move |app, _shortcut, event| {
                // the backend fires on press and release, act on press only
                if event.state != ShortcutState::Pressed {
                    return;
                }
                debug!("[hotkey] {} pressed", slot);
                // some backends deliver events off the main thread
                let handle = app.clone();
                if let Err(e) = app.run_on_main_thread(move || shell::perform(&handle, slot.into())) {
                    warn!("[hotkey] could not dispatch {}: {}", slot, e);
                }
            })
            .map_err(|e| {
                debug!("[hotkey] register {} failed: {}", combo, e);
                ShellError::HotkeyConflict {
                    combo: combo.to_string(),
                }
            })
    }

    fn unregister(&mut self, combo: &Combo) -> Result<(), ShellError> {
        self.app
            .global_shortcut()
            .unregister(combo.shortcut())
            .map_err(|e| ShellError::InvalidShortcut {
                combo: combo.to_string(),
                reason: e.to_string(),
            })
    }

    fn unregister_all(&mut self) -> Result<(), ShellError> {
        self.app
            .global_shortcut()
            .unregister_all()
            .map_err(|e| ShellError::Window(e.to_string()))
    }
}
