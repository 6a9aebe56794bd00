// IPC commands called from injected scripts and the split bar

use tauri::State;

use crate::session::Pane;
use crate::shell::ShellState;
use crate::split::SplitStatus;

/// Reported by the focus script once the chat input has focus.
#[tauri::command]
pub fn focus_acquired(generation: u64, state: State<'_, ShellState>) -> bool {
    state.with(|c| c.on_focus_acquired(generation))
}

/// Divider handle dragged to `x` (logical px from the window's left edge).
#[tauri::command]
pub fn split_divider(x: f64, state: State<'_, ShellState>) -> Result<SplitStatus, String> {
    state.with(|c| c.move_divider(x)).map_err(Into::into)
}

#[tauri::command]
pub fn split_focus(pane: Pane, state: State<'_, ShellState>) -> Result<SplitStatus, String> {
    state.with(|c| c.toggle_pane_focus(pane)).map_err(Into::into)
}

#[tauri::command]
pub fn split_key(key: String, state: State<'_, ShellState>) -> Result<SplitStatus, String> {
    state.with(|c| c.focus_key(&key)).map_err(Into::into)
}

#[tauri::command]
pub fn split_reload(pane: Pane, state: State<'_, ShellState>) -> Result<SplitStatus, String> {
    state.with(|c| c.reload_pane(pane)).map_err(Into::into)
}
