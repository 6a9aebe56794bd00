use thiserror::Error;

use crate::service::Service;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("shortcut {combo} is already registered by another application")]
    HotkeyConflict { combo: String },
    #[error("shortcut {combo} is already bound to the {other} action")]
    ShortcutCollision { combo: String, other: &'static str },
    #[error("invalid shortcut '{combo}': {reason}")]
    InvalidShortcut { combo: String, reason: String },
    #[error("could not load {url}: {reason}")]
    NavigationFailed { url: String, reason: String },
    #[error("gave up focusing the {service} input after {attempts} attempts")]
    FocusAcquisitionTimedOut { service: Service, attempts: u32 },
    #[error("window error: {0}")]
    Window(String),
}

impl From<tauri::Error> for ShellError {
    fn from(e: tauri::Error) -> Self {
        Self::Window(e.to_string())
    }
}

impl From<ShellError> for String {
    fn from(e: ShellError) -> Self {
        e.to_string()
    }
}
