//! Tray menu model.
//!
//! The menu is rebuilt from the session after every action so the radio-style
//! check marks always reflect the current state. Item ids encode the action
//! they trigger, e.g. `service:claude` or `shortcut:split:Alt+Shift+S`.

use crate::service::{Service, WindowSize};
use crate::session::{Pane, Session, ViewState, VisibilityMode};
use crate::shortcut::ShortcutSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    ToggleSingle,
    ToggleSplit,
    Service(Service),
    PaneService(Pane, Service),
    WindowSize(WindowSize),
    Shortcut(ShortcutSlot, String),
    Visibility(VisibilityMode),
    Quit,
}

impl MenuAction {
    pub fn id(&self) -> String {
        match self {
            MenuAction::ToggleSingle => "toggle".into(),
            MenuAction::ToggleSplit => "split".into(),
            MenuAction::Service(s) => format!("service:{}", s.id()),
            MenuAction::PaneService(p, s) => format!("pane:{}:{}", p.id(), s.id()),
            MenuAction::WindowSize(w) => format!("size:{}", w.id()),
            MenuAction::Shortcut(slot, combo) => format!("shortcut:{}:{}", slot.id(), combo),
            MenuAction::Visibility(m) => format!("visibility:{}", m.id()),
            MenuAction::Quit => "quit".into(),
        }
    }

    pub fn parse(id: &str) -> Option<MenuAction> {
        let (kind, rest) = id.split_once(':').unwrap_or((id, ""));
        match kind {
            "toggle" => Some(MenuAction::ToggleSingle),
            "split" => Some(MenuAction::ToggleSplit),
            "quit" => Some(MenuAction::Quit),
            "service" => rest.parse().ok().map(MenuAction::Service),
            "size" => rest.parse().ok().map(MenuAction::WindowSize),
            "visibility" => VisibilityMode::parse(rest).map(MenuAction::Visibility),
            "pane" => {
                let (pane, service) = rest.split_once(':')?;
                let pane = match pane {
                    "left" => Pane::Left,
                    "right" => Pane::Right,
                    _ => return None,
                };
                service.parse().ok().map(|s| MenuAction::PaneService(pane, s))
            }
            "shortcut" => {
                let (slot, combo) = rest.split_once(':')?;
                let slot = match slot {
                    "toggle" => ShortcutSlot::Toggle,
                    "split" => ShortcutSlot::Split,
                    _ => return None,
                };
                (!combo.is_empty()).then(|| MenuAction::Shortcut(slot, combo.to_string()))
            }
            _ => None,
        }
    }
}

impl From<ShortcutSlot> for MenuAction {
    fn from(slot: ShortcutSlot) -> Self {
        match slot {
            ShortcutSlot::Toggle => MenuAction::ToggleSingle,
            ShortcutSlot::Split => MenuAction::ToggleSplit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
    pub title: String,
    pub enabled: bool,
    pub entries: Vec<MenuEntry>,
}

fn radio<T: Copy + PartialEq>(
    items: impl IntoIterator<Item = T>,
    current: T,
    action: impl Fn(T) -> MenuAction,
    label: impl Fn(T) -> String,
) -> Vec<MenuEntry> {
    items
        .into_iter()
        .map(|item| MenuEntry {
            action: action(item),
            label: label(item),
            checked: item == current,
        })
        .collect()
}

fn shortcut_entries(session: &Session, slot: ShortcutSlot) -> Vec<MenuEntry> {
    let current = session.shortcut(slot);
    let mut entries: Vec<MenuEntry> = slot
        .presets()
        .iter()
        .map(|text| MenuEntry {
            action: MenuAction::Shortcut(slot, (*text).to_string()),
            label: (*text).to_string(),
            checked: current.as_str() == *text,
        })
        .collect();
    // a combo configured from the environment may not be a preset
    if !entries.iter().any(|e| e.checked) {
        entries.insert(
            0,
            MenuEntry {
                action: MenuAction::Shortcut(slot, current.to_string()),
                label: current.to_string(),
                checked: true,
            },
        );
    }
    entries
}

/// Label of the show/hide item for the current view.
pub fn toggle_label(session: &Session) -> String {
    match session.view {
        ViewState::VisibleSingle => format!("Hide {}", session.active_service),
        _ => format!("Open {}", session.active_service),
    }
}

pub fn split_label(session: &Session) -> &'static str {
    if session.view == ViewState::VisibleSplit {
        "Hide Split View"
    } else {
        "Open Split View"
    }
}

pub fn groups(session: &Session) -> Vec<MenuGroup> {
    let service_label = |s: Service| s.display_name().to_string();
    vec![
        MenuGroup {
            title: "Service".into(),
            enabled: true,
            entries: radio(Service::ALL, session.active_service, MenuAction::Service, service_label),
        },
        MenuGroup {
            title: "Left Pane".into(),
            enabled: session.split_view,
            entries: radio(
                Service::ALL,
                session.left_service,
                |s| MenuAction::PaneService(Pane::Left, s),
                service_label,
            ),
        },
        MenuGroup {
            title: "Right Pane".into(),
            enabled: session.split_view,
            entries: radio(
                Service::ALL,
                session.right_service,
                |s| MenuAction::PaneService(Pane::Right, s),
                service_label,
            ),
        },
        MenuGroup {
            title: "Window Size".into(),
            enabled: true,
            entries: radio(WindowSize::ALL, session.window_size, MenuAction::WindowSize, WindowSize::label),
        },
        MenuGroup {
            title: "Toggle Shortcut".into(),
            enabled: true,
            entries: shortcut_entries(session, ShortcutSlot::Toggle),
        },
        MenuGroup {
            title: "Split Shortcut".into(),
            enabled: true,
            entries: shortcut_entries(session, ShortcutSlot::Split),
        },
        MenuGroup {
            title: "Visibility".into(),
            enabled: true,
            entries: radio(
                [VisibilityMode::MenubarOnly, VisibilityMode::MenubarAndDock],
                session.visibility_mode,
                MenuAction::Visibility,
                |m| match m {
                    VisibilityMode::MenubarOnly => "Menubar Only".to_string(),
                    VisibilityMode::MenubarAndDock => "Menubar and Dock".to_string(),
                },
            ),
        },
    ]
}
