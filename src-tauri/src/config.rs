//! Startup configuration.
//!
//! Every setting starts from a hardcoded default. A `.env` file or the
//! process environment may override the defaults for a run; nothing is
//! ever written back.

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::ShellError;
use crate::service::{Service, WindowSize};
use crate::session::{Session, ViewState, VisibilityMode};
use crate::shortcut::Combo;
use crate::split;

pub const DEFAULT_TOGGLE_SHORTCUT: &str = "Control+Space";
pub const DEFAULT_SPLIT_SHORTCUT: &str = "Control+Shift+S";

const ENV_SERVICE: &str = "QUICK_AI_SERVICE";
const ENV_WINDOW_SIZE: &str = "QUICK_AI_WINDOW_SIZE";
const ENV_TOGGLE_SHORTCUT: &str = "QUICK_AI_TOGGLE_SHORTCUT";
const ENV_SPLIT_SHORTCUT: &str = "QUICK_AI_SPLIT_SHORTCUT";
const ENV_VISIBILITY: &str = "QUICK_AI_VISIBILITY";
const ENV_LEFT_SERVICE: &str = "QUICK_AI_LEFT_SERVICE";
const ENV_RIGHT_SERVICE: &str = "QUICK_AI_RIGHT_SERVICE";

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub service: Service,
    pub window_size: WindowSize,
    pub toggle_shortcut: Combo,
    pub split_shortcut: Combo,
    pub visibility_mode: VisibilityMode,
    pub left_service: Service,
    pub right_service: Service,
}

impl ShellConfig {
    pub fn defaults() -> Result<Self, ShellError> {
        Ok(Self {
            service: Service::Grok,
            window_size: WindowSize::Standard,
            toggle_shortcut: Combo::parse(DEFAULT_TOGGLE_SHORTCUT)?,
            split_shortcut: Combo::parse(DEFAULT_SPLIT_SHORTCUT)?,
            visibility_mode: VisibilityMode::MenubarOnly,
            left_service: Service::Grok,
            right_service: Service::ChatGpt,
        })
    }

    /// Load `.env` (falling back to `../.env`) and apply any overrides found
    /// in the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build a config from an arbitrary key lookup. Invalid values are
    /// logged and the default is kept.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults()?;

        override_with(&lookup, ENV_SERVICE, &mut config.service, |v| v.parse());
        override_with(&lookup, ENV_WINDOW_SIZE, &mut config.window_size, |v| v.parse());
        override_with(&lookup, ENV_LEFT_SERVICE, &mut config.left_service, |v| v.parse());
        override_with(&lookup, ENV_RIGHT_SERVICE, &mut config.right_service, |v| v.parse());
        override_with(&lookup, ENV_VISIBILITY, &mut config.visibility_mode, |v| {
            VisibilityMode::parse(v).ok_or_else(|| format!("expected 'menubar' or 'dock', got '{v}'"))
        });

        let mut toggle = config.toggle_shortcut.clone();
        let mut split = config.split_shortcut.clone();
        override_with(&lookup, ENV_TOGGLE_SHORTCUT, &mut toggle, |v| {
            Combo::parse(v).map_err(|e| e.to_string())
        });
        override_with(&lookup, ENV_SPLIT_SHORTCUT, &mut split, |v| {
            Combo::parse(v).map_err(|e| e.to_string())
        });
        if toggle == split {
            warn!(
                "[config] toggle and split shortcuts are both {}, keeping defaults",
                toggle
            );
        } else {
            config.toggle_shortcut = toggle;
            config.split_shortcut = split;
        }

        Ok(config)
    }

    pub fn into_session(self) -> Session {
        Session {
            active_service: self.service,
            window_size: self.window_size,
            toggle_shortcut: self.toggle_shortcut,
            split_shortcut: self.split_shortcut,
            visibility_mode: self.visibility_mode,
            split_view: false,
            left_service: self.left_service,
            right_service: self.right_service,
            divider_ratio: split::DEFAULT_RATIO,
            focused_pane: None,
            view: ViewState::Hidden,
            window_exists: false,
        }
    }
}

fn override_with<T, F, P, E>(lookup: &F, key: &str, slot: &mut T, parse: P)
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, E>,
    E: std::fmt::Display,
{
    let Some(raw) = lookup(key) else { return };
    if raw.trim().is_empty() {
        return;
    }
    match parse(&raw) {
        Ok(value) => *slot = value,
        Err(e) => warn!("[config] ignoring {}: {}", key, e),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the default
/// `info` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
