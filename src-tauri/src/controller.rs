//! Shell controller: the window/visibility state machine.
//!
//! States are `Hidden`, `VisibleSingle` and `VisibleSplit`. Every user action
//! (tray menu click, hotkey press, split bar control) and every host event
//! (page load, unreachable site, resize, window closed) goes through one of
//! the transitions below, and they are the only code that mutates the session.

use std::collections::{HashMap, HashSet};

use tauri::Url;
use tracing::{debug, error, info, warn};

use crate::error::ShellError;
use crate::focus::{FocusPolicy, FocusTracker};
use crate::host::{HotkeyHost, Surface, WindowHost};
use crate::menu::MenuAction;
use crate::pages;
use crate::service::{Service, Size, WindowSize};
use crate::session::{Pane, Session, ViewState, VisibilityMode};
use crate::shortcut::{Combo, ShortcutSlot};
use crate::split::{self, Layout, SplitLayout, SplitStatus};

/// What the window is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Content {
    Single(Service),
    Split(Service, Service),
}

pub struct ShellController<W, H> {
    session: Session,
    window: W,
    hotkeys: H,
    focus: FocusTracker,
    focus_policy: FocusPolicy,
    loaded: Option<Content>,
    /// Logical inner size of the main window.
    viewport: Size,
    /// Slots whose combo is actually registered.
    bound: HashSet<ShortcutSlot>,
    /// Latest navigation id per surface; older failure reports are stale.
    navigations: HashMap<Surface, u64>,
    next_navigation: u64,
    /// Surfaces showing the retry page, with the URL they failed on.
    failed: HashMap<Surface, String>,
    shut_down: bool,
}

impl<W: WindowHost, H: HotkeyHost> ShellController<W, H> {
    pub fn new(session: Session, window: W, hotkeys: H) -> Self {
        let viewport = session.effective_size();
        Self {
            session,
            window,
            hotkeys,
            focus: FocusTracker::default(),
            focus_policy: FocusPolicy::default(),
            loaded: None,
            viewport,
            bound: HashSet::new(),
            navigations: HashMap::new(),
            next_navigation: 0,
            failed: HashMap::new(),
            shut_down: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bind both hotkey slots and apply the startup dock visibility.
    /// A slot that cannot be bound is reported and left unbound; the app
    /// stays usable from the tray.
    pub fn start(&mut self) -> Vec<ShellError> {
        let mut failures = Vec::new();
        for slot in [ShortcutSlot::Toggle, ShortcutSlot::Split] {
            let combo = self.session.shortcut(slot).clone();
            match self.hotkeys.register(&combo, slot) {
                Ok(()) => {
                    self.bound.insert(slot);
                    info!("[hotkey] {} bound to {}", slot, combo);
                }
                Err(e) => {
                    warn!("[hotkey] could not bind {} to {}: {}", slot, combo, e);
                    failures.push(e);
                }
            }
        }
        if let Err(e) = self.window.set_dock_visible(self.session.visibility_mode.shows_dock()) {
            warn!("[shell] could not apply visibility mode: {}", e);
        }
        failures
    }

    /// Entry point for tray menu clicks and hotkey presses.
    pub fn apply(&mut self, action: MenuAction) -> Result<(), ShellError> {
        match action {
            MenuAction::ToggleSingle => self.toggle_single(),
            MenuAction::ToggleSplit => self.toggle_split(),
            MenuAction::Service(service) => self.set_service(service),
            MenuAction::PaneService(pane, service) => self.set_split_service(pane, service),
            MenuAction::WindowSize(preset) => self.set_window_size(preset),
            MenuAction::Shortcut(slot, text) => self.set_shortcut(slot, Combo::parse(&text)?),
            MenuAction::Visibility(mode) => self.set_visibility_mode(mode),
            MenuAction::Quit => {
                self.shutdown();
                Ok(())
            }
        }
    }

    pub fn toggle_single(&mut self) -> Result<(), ShellError> {
        if self.session.view == ViewState::VisibleSingle {
            return self.hide();
        }
        // single toggle always forces split view off and stays visible
        self.session.split_view = false;
        self.present(ViewState::VisibleSingle)
    }

    pub fn toggle_split(&mut self) -> Result<(), ShellError> {
        if self.session.view == ViewState::VisibleSplit {
            return self.hide();
        }
        self.session.split_view = true;
        self.present(ViewState::VisibleSplit)
    }

    /// Dock icon clicked. Brings up single view when nothing is showing.
    pub fn reopen(&mut self) -> Result<(), ShellError> {
        if self.session.is_visible() {
            return Ok(());
        }
        self.toggle_single()
    }

    /// Select the single-view service. In split view the choice is only
    /// remembered for the next single view.
    pub fn set_service(&mut self, service: Service) -> Result<(), ShellError> {
        self.session.active_service = service;
        info!("[shell] active service: {}", service);
        if self.session.view == ViewState::VisibleSingle {
            self.window.set_title(&self.session.window_title())?;
            self.load_current()?;
        }
        Ok(())
    }

    pub fn set_split_service(&mut self, pane: Pane, service: Service) -> Result<(), ShellError> {
        if !self.session.split_view {
            debug!("[shell] ignoring {} pane change outside split view", pane.id());
            return Ok(());
        }
        self.session.set_pane_service(pane, service);
        info!("[shell] {} pane: {}", pane.id(), service);
        if self.session.view == ViewState::VisibleSplit {
            self.window.set_title(&self.session.window_title())?;
            // the other pane keeps its page
            self.load_bar()?;
            self.loaded = Some(self.desired());
            self.navigate(Surface::Pane(pane), service)?;
        }
        Ok(())
    }

    pub fn set_window_size(&mut self, preset: WindowSize) -> Result<(), ShellError> {
        self.session.window_size = preset;
        if self.window.exists() {
            self.apply_layout()?;
        }
        Ok(())
    }

    /// Rebind one hotkey slot. A combo already used by the other slot is
    /// rejected. If the new combo cannot be registered the old one is
    /// registered again so the slot keeps working. Re-selecting the current
    /// combo of an unbound slot retries the registration.
    pub fn set_shortcut(&mut self, slot: ShortcutSlot, combo: Combo) -> Result<(), ShellError> {
        if combo == *self.session.shortcut(slot.other()) {
            return Err(ShellError::ShortcutCollision {
                combo: combo.to_string(),
                other: slot.other().id(),
            });
        }
        let current = self.session.shortcut(slot).clone();
        let was_bound = self.bound.contains(&slot);
        if combo == current && was_bound {
            return Ok(());
        }

        if was_bound {
            if let Err(e) = self.hotkeys.unregister(&current) {
                warn!("[hotkey] could not unregister {}: {}", current, e);
            }
            self.bound.remove(&slot);
        }
        match self.hotkeys.register(&combo, slot) {
            Ok(()) => {
                self.bound.insert(slot);
                info!("[hotkey] {} moved from {} to {}", slot, current, combo);
                *self.session.shortcut_mut(slot) = combo;
                Ok(())
            }
            Err(e) => {
                if was_bound {
                    match self.hotkeys.register(&current, slot) {
                        Ok(()) => {
                            self.bound.insert(slot);
                        }
                        Err(rollback) => {
                            error!("[hotkey] {} lost its binding {}: {}", slot, current, rollback);
                        }
                    }
                }
                warn!("[hotkey] could not bind {} to {}: {}", slot, combo, e);
                Err(ShellError::HotkeyConflict {
                    combo: combo.to_string(),
                })
            }
        }
    }

    pub fn set_visibility_mode(&mut self, mode: VisibilityMode) -> Result<(), ShellError> {
        self.session.visibility_mode = mode;
        self.window.set_dock_visible(mode.shows_dock())
    }

    /// A surface started loading `url`. Following the retry link off the
    /// retry page is watched like any other service navigation.
    pub fn on_load_started(&mut self, surface: Surface, url: &Url) {
        if Service::from_url(url).is_none() || self.failed.remove(&surface).is_none() {
            return;
        }
        info!("[window] retrying {} in {}", url, surface.label());
        let navigation = self.next_navigation_id(surface);
        self.window.watch_navigation(surface, url.as_str(), navigation);
        if self.failed.is_empty() {
            self.loaded = Some(self.desired());
        }
    }

    /// A surface finished loading `url`. Single-view service pages get their
    /// chat input focused; split panes get their focus-mode dimming back.
    pub fn on_load_finished(&mut self, surface: Surface, url: &Url) {
        match surface {
            Surface::Single if self.session.view == ViewState::VisibleSingle => {
                match Service::from_url(url) {
                    Some(service) => self.start_focus(service),
                    None => debug!("[shell] loaded {} (no focus target)", url),
                }
            }
            Surface::Pane(pane) if self.session.split_view => {
                let layout = self.split_layout();
                self.dim(pane, &layout);
            }
            _ => {}
        }
    }

    /// The reachability check for `navigation` failed. Stale reports (the
    /// surface has navigated again since) are ignored.
    pub fn on_navigation_failed(
        &mut self,
        surface: Surface,
        navigation: u64,
        url: &str,
        reason: &str,
    ) -> Option<ShellError> {
        if self.navigations.get(&surface) != Some(&navigation) {
            debug!("[window] stale failure for navigation {} ignored", navigation);
            return None;
        }
        self.navigations.remove(&surface);
        if surface == Surface::Single {
            self.focus.cancel();
        }
        self.loaded = None;
        self.show_retry(surface, url, reason);
        Some(ShellError::NavigationFailed {
            url: url.to_string(),
            reason: reason.to_string(),
        })
    }

    pub fn on_focus_acquired(&mut self, generation: u64) -> bool {
        let accepted = self.focus.acknowledge(generation);
        if accepted {
            debug!("[focus] input focused (generation {})", generation);
        }
        accepted
    }

    /// The user resized the window.
    pub fn on_resized(&mut self, size: Size) {
        // minimising reports zero
        if size == self.viewport || size.width == 0 || size.height == 0 {
            return;
        }
        self.viewport = size;
        if let Err(e) = self.arrange() {
            warn!("[window] could not rearrange after resize: {}", e);
        }
    }

    pub fn on_closed(&mut self) {
        self.focus.cancel();
        self.session.window_exists = false;
        self.session.view = ViewState::Hidden;
        self.loaded = None;
        self.navigations.clear();
        self.failed.clear();
        info!("[window] closed");
    }

    /// Release every hotkey. Runs once; later calls do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.focus.cancel();
        if let Err(e) = self.hotkeys.unregister_all() {
            warn!("[hotkey] unregister on shutdown failed: {}", e);
        }
        self.bound.clear();
        info!("[shell] hotkeys released");
    }

    pub fn open_external(&self, url: &str) -> Result<(), ShellError> {
        let parsed = Url::parse(url).map_err(|e| ShellError::NavigationFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https" | "mailto") {
            return Err(ShellError::NavigationFailed {
                url: url.to_string(),
                reason: format!("refusing to open {} links externally", parsed.scheme()),
            });
        }
        self.window.open_external(parsed.as_str())
    }

    pub fn split_status(&self) -> SplitStatus {
        SplitStatus::new(self.session.divider_ratio, &self.split_layout())
    }

    /// Divider handle dragged to `x`. Leaves focus mode.
    pub fn move_divider(&mut self, x: f64) -> Result<SplitStatus, ShellError> {
        self.require_split()?;
        self.session.divider_ratio = split::ratio_at(x, self.viewport);
        self.session.focused_pane = None;
        self.arrange()?;
        Ok(self.split_status())
    }

    /// Pane label clicked: enter focus mode on `pane`, or leave it when
    /// `pane` is already focused.
    pub fn toggle_pane_focus(&mut self, pane: Pane) -> Result<SplitStatus, ShellError> {
        self.require_split()?;
        let focused = split::toggle_focus(self.session.focused_pane, pane);
        self.set_focused_pane(focused)?;
        if focused == Some(pane) {
            self.window.focus(Surface::Pane(pane))?;
        }
        Ok(self.split_status())
    }

    /// Tab, arrow keys or Escape pressed in the split bar.
    pub fn focus_key(&mut self, key: &str) -> Result<SplitStatus, ShellError> {
        self.require_split()?;
        self.set_focused_pane(split::next_focus(self.session.focused_pane, key))?;
        Ok(self.split_status())
    }

    pub fn reload_pane(&mut self, pane: Pane) -> Result<SplitStatus, ShellError> {
        self.require_split()?;
        let service = self.session.pane_service(pane);
        self.navigate(Surface::Pane(pane), service)?;
        Ok(self.split_status())
    }

    fn require_split(&self) -> Result<(), ShellError> {
        if self.session.view == ViewState::VisibleSplit {
            Ok(())
        } else {
            Err(ShellError::Window("split view is not showing".into()))
        }
    }

    fn set_focused_pane(&mut self, focused: Option<Pane>) -> Result<(), ShellError> {
        if focused == self.session.focused_pane {
            return Ok(());
        }
        self.session.focused_pane = focused;
        match focused {
            Some(pane) => debug!("[split] focus mode on the {} pane", pane.id()),
            None => debug!("[split] focus mode off"),
        }
        self.arrange()
    }

    fn desired(&self) -> Content {
        if self.session.split_view {
            Content::Split(self.session.left_service, self.session.right_service)
        } else {
            Content::Single(self.session.active_service)
        }
    }

    /// Show the window in `target` view, creating it and loading content
    /// only when needed.
    fn present(&mut self, target: ViewState) -> Result<(), ShellError> {
        if !self.window.exists() {
            self.session.window_exists = false;
            self.loaded = None;
            self.window
                .create(self.session.effective_size(), &self.session.window_title())?;
            self.session.window_exists = true;
            info!("[window] created {:?}", self.session.effective_size());
        }

        // view must be set before loading so the load-finished event sees it
        self.session.view = target;
        self.apply_layout()?;
        let loaded = if self.loaded == Some(self.desired()) {
            if let Content::Single(service) = self.desired() {
                self.start_focus(service);
            }
            Ok(())
        } else {
            self.load_current()
        };

        // a failed load still shows the retry page
        self.window.show()?;
        self.window.focus(self.focus_surface())?;
        loaded
    }

    fn focus_surface(&self) -> Surface {
        if self.session.split_view {
            Surface::Pane(self.session.focused_pane.unwrap_or(Pane::Left))
        } else {
            Surface::Single
        }
    }

    fn hide(&mut self) -> Result<(), ShellError> {
        if self.focus.is_pending() {
            debug!("[focus] hidden before the input was focused");
        }
        self.focus.cancel();
        self.session.view = ViewState::Hidden;
        if self.window.exists() {
            self.window.hide()?;
        }
        Ok(())
    }

    fn apply_layout(&mut self) -> Result<(), ShellError> {
        self.viewport = self.session.effective_size();
        self.window.resize(self.viewport)?;
        self.window.set_title(&self.session.window_title())?;
        self.arrange()
    }

    fn split_layout(&self) -> SplitLayout {
        split::split_layout(self.viewport, self.session.divider_ratio, self.session.focused_pane)
    }

    /// Place the surfaces for the current view and viewport.
    fn arrange(&mut self) -> Result<(), ShellError> {
        if !self.session.split_view {
            return self
                .window
                .arrange(&Layout::Single(split::single_layout(self.viewport)));
        }
        let layout = self.split_layout();
        self.window.arrange(&Layout::Split(layout))?;
        for pane in [Pane::Left, Pane::Right] {
            self.dim(pane, &layout);
        }
        let status = split::status_script(&SplitStatus::new(self.session.divider_ratio, &layout));
        if let Err(e) = self.window.run_script(Surface::Bar, &status) {
            debug!("[split] could not update the bar: {}", e);
        }
        Ok(())
    }

    fn dim(&mut self, pane: Pane, layout: &SplitLayout) {
        let script = split::dim_script(split::pane_opacity(layout, pane));
        if let Err(e) = self.window.run_script(Surface::Pane(pane), &script) {
            debug!("[split] could not dim the {} pane: {}", pane.id(), e);
        }
    }

    fn load_bar(&mut self) -> Result<(), ShellError> {
        let page = split::bar_page(
            self.session.left_service,
            self.session.right_service,
            &self.split_status(),
        );
        self.window.load_html(Surface::Bar, page)
    }

    fn load_current(&mut self) -> Result<(), ShellError> {
        self.focus.cancel();
        let content = self.desired();
        self.loaded = Some(content);
        let result = match content {
            Content::Single(service) => self.navigate(Surface::Single, service),
            Content::Split(left, right) => self.load_bar().and_then(|()| {
                let left = self.navigate(Surface::Pane(Pane::Left), left);
                let right = self.navigate(Surface::Pane(Pane::Right), right);
                left.and(right)
            }),
        };
        if result.is_err() {
            self.loaded = None;
        }
        result
    }

    fn next_navigation_id(&mut self, surface: Surface) -> u64 {
        self.next_navigation += 1;
        self.navigations.insert(surface, self.next_navigation);
        self.next_navigation
    }

    /// Load `service` into `surface` and start watching that it answers.
    fn navigate(&mut self, surface: Surface, service: Service) -> Result<(), ShellError> {
        let url = service.home_url();
        let navigation = self.next_navigation_id(surface);
        self.failed.remove(&surface);
        match self.window.load_url(surface, url) {
            Ok(()) => {
                self.window.watch_navigation(surface, url, navigation);
                Ok(())
            }
            Err(e) => {
                self.navigations.remove(&surface);
                let reason = match e {
                    ShellError::NavigationFailed { reason, .. } => reason,
                    other => other.to_string(),
                };
                self.show_retry(surface, url, &reason);
                Err(ShellError::NavigationFailed {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }

    fn show_retry(&mut self, surface: Surface, url: &str, reason: &str) {
        warn!("[shell] could not load {} in {}: {}", url, surface.label(), reason);
        self.failed.insert(surface, url.to_string());
        if let Err(e) = self.window.load_html(surface, pages::navigation_failed(url, reason)) {
            error!("[shell] could not show retry page: {}", e);
        }
    }

    fn start_focus(&mut self, service: Service) {
        let signal = self.focus.start();
        debug!(
            "[focus] starting for {} (generation {})",
            service,
            signal.generation()
        );
        self.window
            .start_focus_loop(service, signal, self.focus_policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShellConfig;
    use crate::focus::FocusSignal;
    use crate::split::{DIM_OPACITY, FOCUS_WIDTH};
    use std::sync::Arc;

    const LEFT: Surface = Surface::Pane(Pane::Left);
    const RIGHT: Surface = Surface::Pane(Pane::Right);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(Size, String),
        LoadUrl(Surface, String),
        LoadHtml(Surface, String),
        Watch(Surface, String, u64),
        Arrange(Layout),
        Resize(Size),
        Title(String),
        Show,
        Hide,
        Focus(Surface),
        Script(Surface, String),
        FocusLoop(Service, u64),
        Dock(bool),
    }

    #[derive(Default)]
    struct MockWindow {
        exists: bool,
        calls: Vec<Call>,
        fail_urls: bool,
        signals: Vec<Arc<FocusSignal>>,
    }

    impl MockWindow {
        fn creates(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Create(..))).count()
        }

        fn last_size(&self) -> Option<Size> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Resize(s) | Call::Create(s, _) => Some(*s),
                _ => None,
            })
        }

        fn last_title(&self) -> Option<&str> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Title(t) | Call::Create(_, t) => Some(t.as_str()),
                _ => None,
            })
        }

        fn last_load(&self, surface: Surface) -> Option<&Call> {
            self.calls.iter().rev().find(|c| match c {
                Call::LoadUrl(s, _) | Call::LoadHtml(s, _) => *s == surface,
                _ => false,
            })
        }

        fn last_html(&self, surface: Surface) -> &str {
            match self.last_load(surface) {
                Some(Call::LoadHtml(_, html)) => html,
                other => panic!("expected a local page in {surface:?}, got {other:?}"),
            }
        }

        fn loads(&self) -> usize {
            self.calls
                .iter()
                .filter(|c| matches!(c, Call::LoadUrl(..) | Call::LoadHtml(..)))
                .count()
        }

        fn last_layout(&self) -> Option<Layout> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Arrange(layout) => Some(*layout),
                _ => None,
            })
        }

        fn last_split(&self) -> SplitLayout {
            match self.last_layout() {
                Some(Layout::Split(split)) => split,
                other => panic!("expected split layout, got {other:?}"),
            }
        }

        fn last_script(&self, surface: Surface) -> Option<&str> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Script(s, script) if *s == surface => Some(script.as_str()),
                _ => None,
            })
        }

        fn last_watch(&self, surface: Surface) -> Option<u64> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Watch(s, _, navigation) if *s == surface => Some(*navigation),
                _ => None,
            })
        }
    }

    impl WindowHost for MockWindow {
        fn create(&mut self, size: Size, title: &str) -> Result<(), ShellError> {
            self.exists = true;
            self.calls.push(Call::Create(size, title.to_string()));
            Ok(())
        }
        fn exists(&self) -> bool {
            self.exists
        }
        fn load_url(&mut self, surface: Surface, url: &str) -> Result<(), ShellError> {
            if self.fail_urls {
                return Err(ShellError::Window("offline".into()));
            }
            self.calls.push(Call::LoadUrl(surface, url.to_string()));
            Ok(())
        }
        fn load_html(&mut self, surface: Surface, html: String) -> Result<(), ShellError> {
            self.calls.push(Call::LoadHtml(surface, html));
            Ok(())
        }
        fn watch_navigation(&mut self, surface: Surface, url: &str, navigation: u64) {
            self.calls.push(Call::Watch(surface, url.to_string(), navigation));
        }
        fn arrange(&mut self, layout: &Layout) -> Result<(), ShellError> {
            self.calls.push(Call::Arrange(*layout));
            Ok(())
        }
        fn resize(&mut self, size: Size) -> Result<(), ShellError> {
            self.calls.push(Call::Resize(size));
            Ok(())
        }
        fn set_title(&mut self, title: &str) -> Result<(), ShellError> {
            self.calls.push(Call::Title(title.to_string()));
            Ok(())
        }
        fn show(&mut self) -> Result<(), ShellError> {
            self.calls.push(Call::Show);
            Ok(())
        }
        fn hide(&mut self) -> Result<(), ShellError> {
            self.calls.push(Call::Hide);
            Ok(())
        }
        fn focus(&mut self, surface: Surface) -> Result<(), ShellError> {
            self.calls.push(Call::Focus(surface));
            Ok(())
        }
        fn run_script(&mut self, surface: Surface, script: &str) -> Result<(), ShellError> {
            self.calls.push(Call::Script(surface, script.to_string()));
            Ok(())
        }
        fn start_focus_loop(&mut self, service: Service, signal: Arc<FocusSignal>, _policy: FocusPolicy) {
            self.calls.push(Call::FocusLoop(service, signal.generation()));
            self.signals.push(signal);
        }
        fn open_external(&self, _url: &str) -> Result<(), ShellError> {
            Ok(())
        }
        fn set_dock_visible(&mut self, visible: bool) -> Result<(), ShellError> {
            self.calls.push(Call::Dock(visible));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockHotkeys {
        bound: Vec<(Combo, ShortcutSlot)>,
        taken: Vec<Combo>,
        releases: usize,
    }

    impl HotkeyHost for MockHotkeys {
        fn register(&mut self, combo: &Combo, slot: ShortcutSlot) -> Result<(), ShellError> {
            if self.taken.contains(combo) || self.bound.iter().any(|(c, _)| c == combo) {
                return Err(ShellError::HotkeyConflict {
                    combo: combo.to_string(),
                });
            }
            self.bound.push((combo.clone(), slot));
            Ok(())
        }
        fn unregister(&mut self, combo: &Combo) -> Result<(), ShellError> {
            self.bound.retain(|(c, _)| c != combo);
            Ok(())
        }
        fn unregister_all(&mut self) -> Result<(), ShellError> {
            self.releases += 1;
            self.bound.clear();
            Ok(())
        }
    }

    fn controller() -> ShellController<MockWindow, MockHotkeys> {
        let session = ShellConfig::defaults().unwrap().into_session();
        let mut c = ShellController::new(session, MockWindow::default(), MockHotkeys::default());
        assert!(c.start().is_empty());
        c
    }

    fn combo(s: &str) -> Combo {
        Combo::parse(s).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn bound_slot(c: &ShellController<MockWindow, MockHotkeys>, text: &str) -> Option<ShortcutSlot> {
        let wanted = combo(text);
        c.hotkeys.bound.iter().find(|(k, _)| *k == wanted).map(|(_, s)| *s)
    }

    fn load_url(surface: Surface, s: &str) -> Call {
        Call::LoadUrl(surface, s.to_string())
    }

    #[test]
    fn test_start_binds_default_shortcuts_and_hides_dock() {
        let c = controller();
        assert_eq!(bound_slot(&c, "Control+Space"), Some(ShortcutSlot::Toggle));
        assert_eq!(bound_slot(&c, "Control+Shift+S"), Some(ShortcutSlot::Split));
        assert_eq!(c.window.calls, vec![Call::Dock(false)]);
    }

    #[test]
    fn test_toggle_single_twice_returns_to_hidden() {
        let mut c = controller();
        c.toggle_single().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        assert_eq!(c.window.calls.last(), Some(&Call::Focus(Surface::Single)));
        c.toggle_single().unwrap();
        assert_eq!(c.session().view, ViewState::Hidden);
        assert_eq!(c.window.calls.last(), Some(&Call::Hide));
    }

    #[test]
    fn test_toggling_never_creates_second_window() {
        let mut c = controller();
        for _ in 0..3 {
            c.toggle_single().unwrap();
            c.toggle_single().unwrap();
        }
        c.toggle_split().unwrap();
        c.toggle_split().unwrap();
        assert_eq!(c.window.creates(), 1);
        assert!(c.session().window_exists);
    }

    #[test]
    fn test_reshow_keeps_page_and_refocuses() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.toggle_single().unwrap();
        c.toggle_single().unwrap();
        assert_eq!(c.window.loads(), 1);
        let start = c.window.calls.iter().rev().find(|x| matches!(x, Call::FocusLoop(..)));
        assert!(matches!(start, Some(Call::FocusLoop(Service::Grok, _))));
    }

    #[test]
    fn test_grok_then_chatgpt_scenario() {
        let mut c = controller();
        assert_eq!(c.session().active_service, Service::Grok);
        assert!(!c.session().split_view);

        c.toggle_single().unwrap();
        assert_eq!(c.window.creates(), 1);
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://grok.com/"))
        );
        assert!(c.session().is_visible());
        assert_eq!(
            c.window.last_layout(),
            Some(Layout::Single(split::single_layout(Size { width: 1000, height: 900 })))
        );

        c.set_service(Service::ChatGpt).unwrap();
        assert_eq!(c.window.creates(), 1);
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://chatgpt.com/"))
        );
        assert_eq!(c.window.last_title(), Some("Quick ChatGPT Desktop"));
        assert_eq!(c.session().view, ViewState::VisibleSingle);
    }

    #[test]
    fn test_toggle_split_loads_native_panes() {
        let mut c = controller();
        c.toggle_split().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSplit);
        assert_eq!(c.window.last_size(), Some(Size { width: 2000, height: 900 }));
        assert_eq!(c.window.last_load(LEFT), Some(&load_url(LEFT, "https://grok.com/")));
        assert_eq!(c.window.last_load(RIGHT), Some(&load_url(RIGHT, "https://chatgpt.com/")));
        assert!(c.window.last_html(Surface::Bar).contains("<title>Grok | ChatGPT</title>"));
        assert_eq!(c.window.last_load(Surface::Single), None);

        let layout = c.window.last_split();
        assert_eq!(layout.dimmed, None);
        assert_eq!(layout.left.width, layout.right.width);
        assert_eq!(c.window.calls.last(), Some(&Call::Focus(LEFT)));
    }

    #[test]
    fn test_toggle_split_again_hides_and_remembers_split() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.toggle_split().unwrap();
        assert_eq!(c.session().view, ViewState::Hidden);
        assert!(c.session().split_view);
        let loads = c.window.loads();
        c.toggle_split().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSplit);
        assert_eq!(c.window.loads(), loads);
    }

    #[test]
    fn test_toggle_single_from_split_forces_single_view() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.toggle_single().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        assert!(!c.session().split_view);
        assert_eq!(c.window.last_size(), Some(Size { width: 1000, height: 900 }));
        assert!(matches!(c.window.last_layout(), Some(Layout::Single(_))));
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://grok.com/"))
        );
    }

    #[test]
    fn test_toggle_single_from_hidden_split_turns_split_off() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.toggle_split().unwrap();
        c.toggle_single().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        assert!(!c.session().split_view);
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://grok.com/"))
        );
    }

    #[test]
    fn test_reopen_shows_single_view_when_hidden() {
        let mut c = controller();
        c.reopen().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        assert_eq!(c.window.creates(), 1);

        // a visible window is left alone
        let calls = c.window.calls.len();
        c.reopen().unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        assert_eq!(c.window.calls.len(), calls);
    }

    #[test]
    fn test_window_size_in_split_is_doubled() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.set_window_size(WindowSize::Large).unwrap();
        assert_eq!(c.session().effective_size().width, WindowSize::Large.size().width * 2);
        assert_eq!(c.window.last_size(), Some(Size { width: 2400, height: 1000 }));
        let layout = c.window.last_split();
        assert_eq!(layout.bar.width, 2400.0);
    }

    #[test]
    fn test_window_size_without_window_only_records() {
        let mut c = controller();
        c.set_window_size(WindowSize::Compact).unwrap();
        assert_eq!(c.session().window_size, WindowSize::Compact);
        assert!(!c.window.calls.iter().any(|x| matches!(x, Call::Resize(_))));
        c.toggle_single().unwrap();
        assert_eq!(c.window.last_size(), Some(Size { width: 800, height: 700 }));
    }

    #[test]
    fn test_user_resize_rearranges_panes() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.on_resized(Size { width: 1606, height: 830 });
        let layout = c.window.last_split();
        assert_eq!(layout.bar.width, 1606.0);
        assert_eq!(layout.left.width, 800.0);
        assert_eq!(layout.left.height, 800.0);

        // minimised
        let calls = c.window.calls.len();
        c.on_resized(Size { width: 0, height: 0 });
        assert_eq!(c.window.calls.len(), calls);
    }

    #[test]
    fn test_set_service_never_changes_split_flag() {
        let mut c = controller();
        c.set_service(Service::Claude).unwrap();
        assert!(!c.session().split_view);
        c.toggle_split().unwrap();
        let loads = c.window.loads();
        c.set_service(Service::Gemini).unwrap();
        assert!(c.session().split_view);
        assert_eq!(c.session().active_service, Service::Gemini);
        assert_eq!(c.window.loads(), loads);
    }

    #[test]
    fn test_set_service_while_hidden_loads_on_next_show() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.toggle_single().unwrap();
        c.set_service(Service::T3).unwrap();
        assert_eq!(c.window.loads(), 1);
        c.toggle_single().unwrap();
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://t3.chat/"))
        );
    }

    #[test]
    fn test_pane_service_outside_split_is_noop() {
        let mut c = controller();
        c.toggle_single().unwrap();
        let before = c.session().clone();
        let calls = c.window.calls.len();
        c.set_split_service(Pane::Left, Service::Claude).unwrap();
        assert_eq!(c.session(), &before);
        assert_eq!(c.window.calls.len(), calls);
    }

    #[test]
    fn test_pane_service_reloads_only_that_pane() {
        let mut c = controller();
        c.toggle_split().unwrap();
        let left_before = c.window.calls.iter().filter(|x| matches!(x, Call::LoadUrl(s, _) if *s == LEFT)).count();
        c.set_split_service(Pane::Right, Service::Claude).unwrap();
        assert_eq!(c.session().right_service, Service::Claude);
        assert_eq!(c.window.last_load(RIGHT), Some(&load_url(RIGHT, "https://claude.ai/new")));
        let left_after = c.window.calls.iter().filter(|x| matches!(x, Call::LoadUrl(s, _) if *s == LEFT)).count();
        assert_eq!(left_before, left_after);
        assert!(c.window.last_html(Surface::Bar).contains("<title>Grok | Claude</title>"));
        assert_eq!(c.window.last_title(), Some("Quick AI Desktop - Grok | Claude"));

        // hiding and showing again keeps both pages
        let loads = c.window.loads();
        c.toggle_split().unwrap();
        c.toggle_split().unwrap();
        assert_eq!(c.window.loads(), loads);
    }

    #[test]
    fn test_shortcut_collision_rejected() {
        let mut c = controller();
        let err = c.set_shortcut(ShortcutSlot::Toggle, combo("Control+Shift+S")).unwrap_err();
        assert!(matches!(err, ShellError::ShortcutCollision { other: "split", .. }));
        assert_eq!(c.session().toggle_shortcut.as_str(), "Control+Space");
        assert_eq!(bound_slot(&c, "Control+Space"), Some(ShortcutSlot::Toggle));
        assert_eq!(bound_slot(&c, "Control+Shift+S"), Some(ShortcutSlot::Split));
    }

    #[test]
    fn test_shortcut_rebind() {
        let mut c = controller();
        c.set_shortcut(ShortcutSlot::Toggle, combo("Alt+Space")).unwrap();
        assert_eq!(c.session().toggle_shortcut.as_str(), "Alt+Space");
        assert_eq!(bound_slot(&c, "Alt+Space"), Some(ShortcutSlot::Toggle));
        assert_eq!(bound_slot(&c, "Control+Space"), None);
    }

    #[test]
    fn test_shortcut_same_combo_while_bound_is_noop() {
        let mut c = controller();
        c.set_shortcut(ShortcutSlot::Toggle, combo("Control+Space")).unwrap();
        assert_eq!(c.hotkeys.bound.len(), 2);
        assert_eq!(bound_slot(&c, "Control+Space"), Some(ShortcutSlot::Toggle));
    }

    #[test]
    fn test_shortcut_conflict_keeps_prior_binding() {
        let mut c = controller();
        c.hotkeys.taken.push(combo("Alt+Shift+S"));
        let err = c.set_shortcut(ShortcutSlot::Split, combo("Alt+Shift+S")).unwrap_err();
        assert!(matches!(err, ShellError::HotkeyConflict { .. }));
        assert_eq!(c.session().split_shortcut.as_str(), "Control+Shift+S");
        assert_eq!(bound_slot(&c, "Control+Shift+S"), Some(ShortcutSlot::Split));
    }

    #[test]
    fn test_start_reports_conflicts() {
        let session = ShellConfig::defaults().unwrap().into_session();
        let hotkeys = MockHotkeys {
            taken: vec![combo("Control+Space")],
            ..MockHotkeys::default()
        };
        let mut c = ShellController::new(session, MockWindow::default(), hotkeys);
        let failures = c.start();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ShellError::HotkeyConflict { .. }));
        assert_eq!(bound_slot(&c, "Control+Shift+S"), Some(ShortcutSlot::Split));
    }

    #[test]
    fn test_reselecting_unbound_shortcut_retries_registration() {
        let session = ShellConfig::defaults().unwrap().into_session();
        let hotkeys = MockHotkeys {
            taken: vec![combo("Control+Space")],
            ..MockHotkeys::default()
        };
        let mut c = ShellController::new(session, MockWindow::default(), hotkeys);
        assert_eq!(c.start().len(), 1);
        assert_eq!(bound_slot(&c, "Control+Space"), None);

        // the other application let go of the combo
        c.hotkeys.taken.clear();
        c.set_shortcut(ShortcutSlot::Toggle, combo("Control+Space")).unwrap();
        assert_eq!(bound_slot(&c, "Control+Space"), Some(ShortcutSlot::Toggle));
    }

    #[test]
    fn test_unbound_slot_rebind_failure_registers_nothing() {
        let session = ShellConfig::defaults().unwrap().into_session();
        let hotkeys = MockHotkeys {
            taken: vec![combo("Control+Space"), combo("Alt+Space")],
            ..MockHotkeys::default()
        };
        let mut c = ShellController::new(session, MockWindow::default(), hotkeys);
        c.start();
        let err = c.set_shortcut(ShortcutSlot::Toggle, combo("Alt+Space")).unwrap_err();
        assert!(matches!(err, ShellError::HotkeyConflict { .. }));
        assert_eq!(c.hotkeys.bound.len(), 1);
        assert_eq!(c.session().toggle_shortcut.as_str(), "Control+Space");
    }

    #[test]
    fn test_hotkey_slots_dispatch_toggles() {
        let mut c = controller();
        c.apply(ShortcutSlot::Split.into()).unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSplit);
        c.apply(ShortcutSlot::Toggle.into()).unwrap();
        assert_eq!(c.session().view, ViewState::VisibleSingle);
        c.apply(ShortcutSlot::Toggle.into()).unwrap();
        assert_eq!(c.session().view, ViewState::Hidden);
    }

    #[test]
    fn test_apply_menu_ids() {
        let mut c = controller();
        for id in ["service:claude", "size:compact", "visibility:dock", "shortcut:split:Alt+Shift+S", "split", "pane:left:t3"] {
            c.apply(MenuAction::parse(id).unwrap()).unwrap();
        }
        let s = c.session();
        assert_eq!(s.active_service, Service::Claude);
        assert_eq!(s.window_size, WindowSize::Compact);
        assert_eq!(s.visibility_mode, VisibilityMode::MenubarAndDock);
        assert_eq!(s.split_shortcut.as_str(), "Alt+Shift+S");
        assert_eq!(s.left_service, Service::T3);
        assert_eq!(c.window.last_size(), Some(Size { width: 1600, height: 700 }));
    }

    #[test]
    fn test_apply_invalid_shortcut_text() {
        let mut c = controller();
        let err = c
            .apply(MenuAction::Shortcut(ShortcutSlot::Toggle, "Control+Banana".into()))
            .unwrap_err();
        assert!(matches!(err, ShellError::InvalidShortcut { .. }));
        assert_eq!(c.session().toggle_shortcut.as_str(), "Control+Space");
    }

    #[test]
    fn test_visibility_mode() {
        let mut c = controller();
        c.set_visibility_mode(VisibilityMode::MenubarAndDock).unwrap();
        assert_eq!(c.session().visibility_mode, VisibilityMode::MenubarAndDock);
        assert_eq!(c.window.calls.last(), Some(&Call::Dock(true)));
    }

    #[test]
    fn test_load_finished_starts_focus_in_single_view() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        let first = c.window.signals.last().unwrap().clone();
        assert!(!first.is_cancelled());

        c.set_service(Service::Claude).unwrap();
        assert!(first.is_cancelled());
        c.on_load_finished(Surface::Single, &url("https://claude.ai/new"));
        assert!(matches!(c.window.calls.last(), Some(Call::FocusLoop(Service::Claude, _))));
    }

    #[test]
    fn test_load_finished_ignored_in_split_view() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        c.on_load_finished(LEFT, &url("https://grok.com/"));
        assert!(c.window.signals.is_empty());
    }

    #[test]
    fn test_focus_acknowledged_once() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        let signal = c.window.signals.last().unwrap().clone();
        assert!(c.on_focus_acquired(signal.generation()));
        assert!(signal.is_acquired());
        assert!(!c.on_focus_acquired(signal.generation()));
    }

    #[test]
    fn test_hide_cancels_focus() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        let signal = c.window.signals.last().unwrap().clone();
        c.toggle_single().unwrap();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_closed_window_is_recreated() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        let signal = c.window.signals.last().unwrap().clone();
        c.window.exists = false;
        c.on_closed();
        assert!(signal.is_cancelled());
        assert_eq!(c.session().view, ViewState::Hidden);
        assert!(!c.session().window_exists);

        c.toggle_single().unwrap();
        assert_eq!(c.window.creates(), 2);
        assert_eq!(c.window.loads(), 2);
    }

    #[test]
    fn test_navigation_failure_shows_retry_page() {
        let mut c = controller();
        c.window.fail_urls = true;
        let err = c.toggle_single().unwrap_err();
        match err {
            ShellError::NavigationFailed { url, reason } => {
                assert_eq!(url, "https://grok.com/");
                assert!(reason.contains("offline"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(c.window.last_html(Surface::Single).contains("Retry"));

        c.window.fail_urls = false;
        c.set_service(Service::Grok).unwrap();
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://grok.com/"))
        );
    }

    #[test]
    fn test_unreachable_site_shows_retry_page() {
        let mut c = controller();
        c.toggle_single().unwrap();
        c.on_load_finished(Surface::Single, &url("https://grok.com/"));
        let signal = c.window.signals.last().unwrap().clone();
        let navigation = c.window.last_watch(Surface::Single).unwrap();

        let err = c.on_navigation_failed(Surface::Single, navigation, "https://grok.com/", "could not connect");
        assert!(matches!(err, Some(ShellError::NavigationFailed { .. })));
        assert!(signal.is_cancelled());
        let html = c.window.last_html(Surface::Single);
        assert!(html.contains(r#"href="https://grok.com/""#));
        assert!(html.contains("could not connect"));

        // the retry link is watched again, and a reshow reloads
        c.on_load_started(Surface::Single, &url("https://grok.com/"));
        let retry = c.window.last_watch(Surface::Single).unwrap();
        assert!(retry > navigation);
        let loads = c.window.loads();
        c.toggle_single().unwrap();
        c.toggle_single().unwrap();
        assert_eq!(c.window.loads(), loads);
    }

    #[test]
    fn test_reshow_after_failure_reloads() {
        let mut c = controller();
        c.toggle_single().unwrap();
        let navigation = c.window.last_watch(Surface::Single).unwrap();
        c.on_navigation_failed(Surface::Single, navigation, "https://grok.com/", "timed out");
        c.toggle_single().unwrap();
        c.toggle_single().unwrap();
        assert_eq!(
            c.window.last_load(Surface::Single),
            Some(&load_url(Surface::Single, "https://grok.com/"))
        );
    }

    #[test]
    fn test_stale_navigation_failure_ignored() {
        let mut c = controller();
        c.toggle_single().unwrap();
        let stale = c.window.last_watch(Surface::Single).unwrap();
        c.set_service(Service::Claude).unwrap();
        let calls = c.window.calls.len();
        assert_eq!(c.on_navigation_failed(Surface::Single, stale, "https://grok.com/", "timed out"), None);
        assert_eq!(c.window.calls.len(), calls);
    }

    #[test]
    fn test_local_pages_do_not_count_as_retry() {
        let mut c = controller();
        c.toggle_single().unwrap();
        let navigation = c.window.last_watch(Surface::Single).unwrap();
        c.on_navigation_failed(Surface::Single, navigation, "https://grok.com/", "timed out");
        let calls = c.window.calls.len();
        c.on_load_started(Surface::Single, &url("http://quickai.localhost/main-single?rev=2"));
        assert_eq!(c.window.calls.len(), calls);
    }

    #[test]
    fn test_split_pane_retry_links_to_pane_service() {
        let mut c = controller();
        c.toggle_split().unwrap();
        let navigation = c.window.last_watch(RIGHT).unwrap();
        c.on_navigation_failed(RIGHT, navigation, "https://chatgpt.com/", "could not connect");
        let html = c.window.last_html(RIGHT);
        assert!(html.contains(r#"href="https://chatgpt.com/""#));
        assert!(!html.contains("split view"));
        assert_eq!(c.window.last_load(LEFT), Some(&load_url(LEFT, "https://grok.com/")));

        c.reload_pane(Pane::Right).unwrap();
        assert_eq!(c.window.last_load(RIGHT), Some(&load_url(RIGHT, "https://chatgpt.com/")));
    }

    #[test]
    fn test_divider_drag_is_clamped() {
        let mut c = controller();
        c.toggle_split().unwrap();
        // 2000 wide viewport leaves 1994 px for the panes
        let status = c.move_divider(50.0).unwrap();
        assert_eq!(status.ratio, split::MIN_RATIO);
        assert_eq!(c.session().divider_ratio, split::MIN_RATIO);
        let status = c.move_divider(1990.0).unwrap();
        assert_eq!(status.ratio, split::MAX_RATIO);
        let layout = c.window.last_split();
        assert!((layout.left.width - 1994.0 * split::MAX_RATIO).abs() < 1e-9);
        let bar = c.window.last_script(Surface::Bar).unwrap();
        assert!(bar.contains(r#""ratio":0.8"#));
    }

    #[test]
    fn test_divider_needs_visible_split() {
        let mut c = controller();
        c.toggle_single().unwrap();
        assert!(c.move_divider(400.0).is_err());
        assert!(c.toggle_pane_focus(Pane::Left).is_err());
        assert!(c.reload_pane(Pane::Left).is_err());
        assert_eq!(c.session().divider_ratio, split::DEFAULT_RATIO);
    }

    #[test]
    fn test_focus_mode_widens_and_dims() {
        let mut c = controller();
        c.toggle_split().unwrap();
        let status = c.toggle_pane_focus(Pane::Right).unwrap();
        assert_eq!(status.focused, Some(Pane::Right));
        let layout = c.window.last_split();
        assert!((layout.right.width - 1994.0 * FOCUS_WIDTH).abs() < 1e-9);
        assert_eq!(layout.dimmed, Some(Pane::Left));
        assert_eq!(c.window.last_script(LEFT), Some(split::dim_script(DIM_OPACITY).as_str()));
        assert_eq!(c.window.last_script(RIGHT), Some(split::dim_script(1.0).as_str()));
        assert_eq!(c.window.calls.last(), Some(&Call::Focus(RIGHT)));

        // clicking the focused pane again leaves focus mode
        let status = c.toggle_pane_focus(Pane::Right).unwrap();
        assert_eq!(status.focused, None);
        assert_eq!(c.window.last_script(LEFT), Some(split::dim_script(1.0).as_str()));
    }

    #[test]
    fn test_focus_keys_switch_panes() {
        let mut c = controller();
        c.toggle_split().unwrap();
        assert_eq!(c.focus_key("Tab").unwrap().focused, None);
        c.toggle_pane_focus(Pane::Left).unwrap();
        assert_eq!(c.focus_key("Tab").unwrap().focused, Some(Pane::Right));
        assert_eq!(c.focus_key("ArrowLeft").unwrap().focused, Some(Pane::Left));
        assert_eq!(c.focus_key("ArrowRight").unwrap().focused, Some(Pane::Right));
        assert_eq!(c.focus_key("Escape").unwrap().focused, None);
        assert_eq!(c.session().focused_pane, None);
    }

    #[test]
    fn test_divider_drag_leaves_focus_mode() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.toggle_pane_focus(Pane::Left).unwrap();
        let status = c.move_divider(700.0).unwrap();
        assert_eq!(status.focused, None);
        assert_eq!(c.window.last_split().dimmed, None);
    }

    #[test]
    fn test_reloaded_pane_is_dimmed_again() {
        let mut c = controller();
        c.toggle_split().unwrap();
        c.toggle_pane_focus(Pane::Left).unwrap();
        c.window.calls.clear();
        c.on_load_finished(RIGHT, &url("https://chatgpt.com/"));
        assert_eq!(
            c.window.calls,
            vec![Call::Script(RIGHT, split::dim_script(DIM_OPACITY))]
        );
    }

    #[test]
    fn test_open_external_rejects_local_schemes() {
        let c = controller();
        assert!(c.open_external("https://x.ai/blog").is_ok());
        assert!(matches!(
            c.open_external("file:///etc/passwd"),
            Err(ShellError::NavigationFailed { .. })
        ));
    }

    #[test]
    fn test_shutdown_releases_hotkeys_once() {
        let mut c = controller();
        c.apply(MenuAction::Quit).unwrap();
        assert!(c.hotkeys.bound.is_empty());
        c.shutdown();
        assert_eq!(c.hotkeys.releases, 1);
    }
}
