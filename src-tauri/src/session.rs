use serde::{Deserialize, Serialize};

use crate::service::{Service, Size, WindowSize};
use crate::shortcut::{Combo, ShortcutSlot};
use crate::split;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Hidden,
    VisibleSingle,
    VisibleSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityMode {
    MenubarOnly,
    MenubarAndDock,
}

impl VisibilityMode {
    pub fn id(self) -> &'static str {
        match self {
            VisibilityMode::MenubarOnly => "menubar",
            VisibilityMode::MenubarAndDock => "dock",
        }
    }

    pub fn shows_dock(self) -> bool {
        self == VisibilityMode::MenubarAndDock
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "menubar" | "menubar-only" => Some(VisibilityMode::MenubarOnly),
            "dock" | "menubar-and-dock" => Some(VisibilityMode::MenubarAndDock),
            _ => None,
        }
    }
}

/// One side of the split view. Serialized as `left`/`right` for the split
/// control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    Left,
    Right,
}

impl Pane {
    pub fn id(self) -> &'static str {
        match self {
            Pane::Left => "left",
            Pane::Right => "right",
        }
    }

    pub fn other(self) -> Pane {
        match self {
            Pane::Left => Pane::Right,
            Pane::Right => Pane::Left,
        }
    }
}

/// Everything the shell remembers for the lifetime of the process.
/// Nothing here is written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub active_service: Service,
    pub window_size: WindowSize,
    pub toggle_shortcut: Combo,
    pub split_shortcut: Combo,
    pub visibility_mode: VisibilityMode,
    pub split_view: bool,
    pub left_service: Service,
    pub right_service: Service,
    /// Left pane share of the split width, kept within the divider limits.
    pub divider_ratio: f64,
    /// Pane widened by focus mode, if any.
    pub focused_pane: Option<Pane>,
    pub view: ViewState,
    pub window_exists: bool,
}

impl Session {
    pub fn shortcut(&self, slot: ShortcutSlot) -> &Combo {
        match slot {
            ShortcutSlot::Toggle => &self.toggle_shortcut,
            ShortcutSlot::Split => &self.split_shortcut,
        }
    }

    pub(crate) fn shortcut_mut(&mut self, slot: ShortcutSlot) -> &mut Combo {
        match slot {
            ShortcutSlot::Toggle => &mut self.toggle_shortcut,
            ShortcutSlot::Split => &mut self.split_shortcut,
        }
    }

    pub fn pane_service(&self, pane: Pane) -> Service {
        match pane {
            Pane::Left => self.left_service,
            Pane::Right => self.right_service,
        }
    }

    pub(crate) fn set_pane_service(&mut self, pane: Pane, service: Service) {
        match pane {
            Pane::Left => self.left_service = service,
            Pane::Right => self.right_service = service,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.view != ViewState::Hidden
    }

    /// Window size for the current view: the preset in single view, twice
    /// its width in split view.
    pub fn effective_size(&self) -> Size {
        let size = self.window_size.size();
        if self.split_view {
            Size {
                width: size.width * 2,
                height: size.height,
            }
        } else {
            size
        }
    }

    pub fn window_title(&self) -> String {
        if self.split_view {
            format!(
                "Quick AI Desktop - {} | {}",
                self.left_service.display_name(),
                self.right_service.display_name()
            )
        } else {
            format!("Quick {} Desktop", self.active_service.display_name())
        }
    }
}
