use std::fmt;
use std::str::FromStr;
use tauri_plugin_global_shortcut::Shortcut;

use crate::error::ShellError;

/// The two global hotkey bindings the shell owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutSlot {
    Toggle,
    Split,
}

impl ShortcutSlot {
    pub fn id(self) -> &'static str {
        match self {
            ShortcutSlot::Toggle => "toggle",
            ShortcutSlot::Split => "split",
        }
    }

    pub fn other(self) -> ShortcutSlot {
        match self {
            ShortcutSlot::Toggle => ShortcutSlot::Split,
            ShortcutSlot::Split => ShortcutSlot::Toggle,
        }
    }

    /// Combinations offered in the tray menu for this slot.
    pub fn presets(self) -> &'static [&'static str] {
        match self {
            ShortcutSlot::Toggle => &[
                "Control+Space",
                "Alt+Space",
                "CommandOrControl+Shift+Space",
                "CommandOrControl+Shift+G",
            ],
            ShortcutSlot::Split => &[
                "Control+Shift+S",
                "Alt+Shift+S",
                "CommandOrControl+Shift+D",
                "CommandOrControl+Shift+2",
            ],
        }
    }
}

impl fmt::Display for ShortcutSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A parsed global key combination.
///
/// Two combos are equal when they resolve to the same modifiers and key, so
/// `Ctrl+Space` and `Control+Space` collide.
#[derive(Debug, Clone)]
pub struct Combo {
    text: String,
    shortcut: Shortcut,
}

impl Combo {
    pub fn parse(text: &str) -> Result<Self, ShellError> {
        let text = text.trim();
        let shortcut = Shortcut::from_str(text).map_err(|e| ShellError::InvalidShortcut {
            combo: text.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            text: text.to_string(),
            shortcut,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn shortcut(&self) -> Shortcut {
        self.shortcut
    }
}

impl PartialEq for Combo {
    fn eq(&self, other: &Self) -> bool {
        self.shortcut == other.shortcut
    }
}

impl Eq for Combo {}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Combo {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Combo::parse(s)
    }
}
