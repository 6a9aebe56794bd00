//! Collaborator seams between the shell controller and the platform.
//!
//! The controller only ever talks to these traits. The Tauri-backed
//! implementations live in `window.rs` and `hotkey.rs`; tests use recording
//! mocks.

use std::sync::Arc;

use crate::error::ShellError;
use crate::focus::{FocusPolicy, FocusSignal};
use crate::service::{Service, Size};
use crate::session::Pane;
use crate::shortcut::{Combo, ShortcutSlot};
use crate::split::{Layout, Rect};

/// One of the webviews inside the main window. Single view uses `Single`;
/// split view shows both panes under the control bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Single,
    Pane(Pane),
    Bar,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::Single,
        Surface::Pane(Pane::Left),
        Surface::Pane(Pane::Right),
        Surface::Bar,
    ];

    /// Webview label, also the page name on the local scheme.
    pub fn label(self) -> &'static str {
        match self {
            Surface::Single => "main-single",
            Surface::Pane(Pane::Left) => "main-left",
            Surface::Pane(Pane::Right) => "main-right",
            Surface::Bar => "main-bar",
        }
    }
}

/// Where `surface` goes under `layout`, or `None` when it is hidden.
pub fn placement(layout: &Layout, surface: Surface) -> Option<Rect> {
    match (layout, surface) {
        (Layout::Single(rect), Surface::Single) => Some(*rect),
        (Layout::Split(split), Surface::Pane(pane)) => Some(split.pane(pane)),
        (Layout::Split(split), Surface::Bar) => Some(split.bar),
        _ => None,
    }
}

/// The main window and its webviews.
pub trait WindowHost {
    /// Create the (hidden) window with every surface on a blank page.
    /// Called at most once per window lifetime.
    fn create(&mut self, size: Size, title: &str) -> Result<(), ShellError>;
    fn exists(&self) -> bool;
    fn load_url(&mut self, surface: Surface, url: &str) -> Result<(), ShellError>;
    /// Replace a surface's content with a locally composed page.
    fn load_html(&mut self, surface: Surface, html: String) -> Result<(), ShellError>;
    /// Check in the background that `url` answers. An unreachable site is
    /// reported back through `on_navigation_failed` with `navigation`.
    fn watch_navigation(&mut self, surface: Surface, url: &str, navigation: u64);
    /// Place, show and hide surfaces for `layout`.
    fn arrange(&mut self, layout: &Layout) -> Result<(), ShellError>;
    fn resize(&mut self, size: Size) -> Result<(), ShellError>;
    fn set_title(&mut self, title: &str) -> Result<(), ShellError>;
    fn show(&mut self) -> Result<(), ShellError>;
    fn hide(&mut self) -> Result<(), ShellError>;
    fn focus(&mut self, surface: Surface) -> Result<(), ShellError>;
    fn run_script(&mut self, surface: Surface, script: &str) -> Result<(), ShellError>;
    /// Spawn the timed retry loop that focuses `service`'s chat input in the
    /// single surface. The loop must stop as soon as `signal` is cancelled
    /// or acquired.
    fn start_focus_loop(&mut self, service: Service, signal: Arc<FocusSignal>, policy: FocusPolicy);
    fn open_external(&self, url: &str) -> Result<(), ShellError>;
    fn set_dock_visible(&mut self, visible: bool) -> Result<(), ShellError>;
}

/// Process-wide key combination registry.
pub trait HotkeyHost {
    /// Bind `combo` to `slot`. Fails with `HotkeyConflict` when the
    /// combination is taken.
    fn register(&mut self, combo: &Combo, slot: ShortcutSlot) -> Result<(), ShellError>;
    fn unregister(&mut self, combo: &Combo) -> Result<(), ShellError>;
    fn unregister_all(&mut self) -> Result<(), ShellError>;
}
