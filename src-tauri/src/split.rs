//! Split view geometry and the control bar.
//!
//! In split view the main window hosts two native webviews side by side, one
//! per service, under a thin local control bar. The bar carries the divider
//! handle and the focus-mode controls; every change it makes goes through the
//! controller, which owns the geometry computed here.

use serde::Serialize;

use crate::service::{Service, Size};
use crate::session::Pane;

/// Divider limits, as a fraction of the width shared by both panes
pub const MIN_RATIO: f64 = 0.2;
pub const MAX_RATIO: f64 = 0.8;

pub const DEFAULT_RATIO: f64 = 0.5;

/// Share of the pane width the focused pane takes in focus mode
pub const FOCUS_WIDTH: f64 = 0.95;

/// Opacity of the unfocused pane in focus mode
pub const DIM_OPACITY: f64 = 0.3;

/// Height of the control bar (logical px)
pub const BAR_HEIGHT: f64 = 30.0;

/// Gap between the two panes (logical px)
pub const DIVIDER_WIDTH: f64 = 6.0;

/// Logical rectangle inside the main window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitLayout {
    pub bar: Rect,
    pub left: Rect,
    pub right: Rect,
    pub dimmed: Option<Pane>,
}

impl SplitLayout {
    pub fn pane(&self, pane: Pane) -> Rect {
        match pane {
            Pane::Left => self.left,
            Pane::Right => self.right,
        }
    }
}

/// How the main window's webviews are placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Single(Rect),
    Split(SplitLayout),
}

pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        return DEFAULT_RATIO;
    }
    ratio.clamp(MIN_RATIO, MAX_RATIO)
}

fn panes_width(viewport: Size) -> f64 {
    (f64::from(viewport.width) - DIVIDER_WIDTH).max(0.0)
}

/// Divider ratio for a handle dragged to `x` (logical px from the left edge).
pub fn ratio_at(x: f64, viewport: Size) -> f64 {
    let width = panes_width(viewport);
    if width <= 0.0 {
        return DEFAULT_RATIO;
    }
    clamp_ratio((x - DIVIDER_WIDTH / 2.0) / width)
}

pub fn single_layout(viewport: Size) -> Rect {
    Rect {
        x: 0.0,
        y: 0.0,
        width: f64::from(viewport.width),
        height: f64::from(viewport.height),
    }
}

pub fn split_layout(viewport: Size, ratio: f64, focused: Option<Pane>) -> SplitLayout {
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let shared = panes_width(viewport);
    let share = match focused {
        None => clamp_ratio(ratio),
        Some(Pane::Left) => FOCUS_WIDTH,
        Some(Pane::Right) => 1.0 - FOCUS_WIDTH,
    };
    let left_width = shared * share;
    let top = BAR_HEIGHT.min(height);
    let pane_height = height - top;

    SplitLayout {
        bar: Rect {
            x: 0.0,
            y: 0.0,
            width,
            height: top,
        },
        left: Rect {
            x: 0.0,
            y: top,
            width: left_width,
            height: pane_height,
        },
        right: Rect {
            x: left_width + DIVIDER_WIDTH,
            y: top,
            width: shared - left_width,
            height: pane_height,
        },
        dimmed: focused.map(Pane::other),
    }
}

/// Focus-mode transition for a key pressed in the control bar. Tab and the
/// arrow keys only move an active focus; Escape leaves focus mode.
pub fn next_focus(current: Option<Pane>, key: &str) -> Option<Pane> {
    match (key, current) {
        ("Escape", _) => None,
        (_, None) => None,
        ("Tab", Some(pane)) => Some(pane.other()),
        ("ArrowLeft", Some(_)) => Some(Pane::Left),
        ("ArrowRight", Some(_)) => Some(Pane::Right),
        (_, current) => current,
    }
}

/// Clicking a pane's label focuses it, clicking the focused one again leaves
/// focus mode.
pub fn toggle_focus(current: Option<Pane>, pane: Pane) -> Option<Pane> {
    if current == Some(pane) {
        None
    } else {
        Some(pane)
    }
}

pub fn pane_opacity(layout: &SplitLayout, pane: Pane) -> f64 {
    if layout.dimmed == Some(pane) {
        DIM_OPACITY
    } else {
        1.0
    }
}

/// What the control bar needs to draw itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitStatus {
    pub ratio: f64,
    pub focused: Option<Pane>,
    pub left: Rect,
    pub right: Rect,
}

impl SplitStatus {
    pub fn new(ratio: f64, layout: &SplitLayout) -> Self {
        Self {
            ratio,
            focused: layout.dimmed.map(Pane::other),
            left: layout.left,
            right: layout.right,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".into())
}

/// Script pushed into the bar whenever the layout changes.
pub fn status_script(status: &SplitStatus) -> String {
    format!(
        "window.__quickAiSplit && window.__quickAiSplit({});",
        to_json(status)
    )
}

/// Script that fades a pane's page for focus mode.
pub fn dim_script(opacity: f64) -> String {
    format!(
        "(function() {{ var r = document.documentElement; if (!r) return; r.style.transition = 'opacity 0.15s'; r.style.opacity = '{opacity}'; }})();"
    )
}

pub fn bar_page(left: Service, right: Service, status: &SplitStatus) -> String {
    let left_name = left.display_name();
    let right_name = right.display_name();
    let initial = to_json(status);
    let gap = DIVIDER_WIDTH;

    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{left_name} | {right_name}</title>
<style>
  html, body {{ margin: 0; height: 100%; overflow: hidden; background: #1e1e1e; color: #ccc; font: 12px -apple-system, "Segoe UI", sans-serif; user-select: none; }}
  .side {{ position: absolute; top: 0; bottom: 0; display: flex; align-items: center; justify-content: center; gap: 8px; }}
  .side.dimmed {{ opacity: 0.4; }}
  .side.focused .name {{ color: #fff; border-color: #5a8dee; }}
  .name, button {{ background: none; color: inherit; border: 1px solid transparent; border-radius: 4px; padding: 2px 8px; font: inherit; cursor: pointer; }}
  button:hover, .name:hover {{ border-color: #555; }}
  #handle {{ position: absolute; top: 0; bottom: 0; width: {gap}px; background: #3a3a3a; cursor: col-resize; }}
  #handle:hover, body.dragging #handle {{ background: #5a8dee; }}
</style>
</head>
<body>
<div class="side" id="left">
  <button class="name" data-action="focus" title="Focus mode">{left_name}</button>
  <button data-action="reload" title="Reload">&#x21bb;</button>
</div>
<div id="handle"></div>
<div class="side" id="right">
  <button class="name" data-action="focus" title="Focus mode">{right_name}</button>
  <button data-action="reload" title="Reload">&#x21bb;</button>
</div>
<script>
(function() {{
  var ipc = window.__TAURI_INTERNALS__;
  var sides = {{ left: document.getElementById('left'), right: document.getElementById('right') }};
  var handle = document.getElementById('handle');
  var dragging = false;

  function apply(status) {{
    if (!status) return;
    handle.style.left = (status.left.x + status.left.width) + 'px';
    ['left', 'right'].forEach(function(side) {{
      var rect = status[side];
      var el = sides[side];
      el.style.left = rect.x + 'px';
      el.style.width = rect.width + 'px';
      el.classList.toggle('focused', status.focused === side);
      el.classList.toggle('dimmed', status.focused !== null && status.focused !== side);
    }});
  }}

  function call(cmd, args) {{
    if (!ipc || !ipc.invoke) return;
    ipc.invoke(cmd, args).then(apply).catch(function() {{}});
  }}

  window.__quickAiSplit = apply;

  handle.addEventListener('pointerdown', function(e) {{
    e.preventDefault();
    dragging = true;
    handle.setPointerCapture(e.pointerId);
    document.body.classList.add('dragging');
  }});
  handle.addEventListener('pointermove', function(e) {{
    if (dragging) call('split_divider', {{ x: e.clientX }});
  }});
  handle.addEventListener('pointerup', function(e) {{
    dragging = false;
    handle.releasePointerCapture(e.pointerId);
    document.body.classList.remove('dragging');
  }});

  ['left', 'right'].forEach(function(side) {{
    sides[side].querySelectorAll('button').forEach(function(btn) {{
      btn.addEventListener('click', function() {{
        if (btn.dataset.action === 'focus') call('split_focus', {{ pane: side }});
        else call('split_reload', {{ pane: side }});
      }});
    }});
  }});

  document.addEventListener('keydown', function(e) {{
    if (['Tab', 'ArrowLeft', 'ArrowRight', 'Escape'].indexOf(e.key) < 0) return;
    e.preventDefault();
    call('split_key', {{ key: e.key }});
  }});

  apply({initial});
}})();
</script>
</body>
</html>
"#
    )
}
