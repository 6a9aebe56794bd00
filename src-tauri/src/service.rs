//! Supported chat services and window size presets.
//!
//! Everything the shell needs to know about a site lives in one static table:
//! display name, home URL, the hosts that identify it, and the selector used
//! to find its chat input after a page load.

use std::fmt;
use std::str::FromStr;
use tauri::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    ChatGpt,
    Claude,
    Grok,
    Gemini,
    OpenRouter,
    T3,
}

struct ServiceInfo {
    id: &'static str,
    name: &'static str,
    home: &'static str,
    hosts: &'static [&'static str],
    input_selector: &'static str,
}

const CHATGPT: ServiceInfo = ServiceInfo {
    id: "chatgpt",
    name: "ChatGPT",
    home: "https://chatgpt.com/",
    hosts: &["chatgpt.com", "chat.openai.com"],
    input_selector: "#prompt-textarea, textarea[data-id], div[contenteditable=\"true\"]",
};

const CLAUDE: ServiceInfo = ServiceInfo {
    id: "claude",
    name: "Claude",
    home: "https://claude.ai/new",
    hosts: &["claude.ai"],
    input_selector: "div.ProseMirror[contenteditable=\"true\"], div[contenteditable=\"true\"]",
};

const GROK: ServiceInfo = ServiceInfo {
    id: "grok",
    name: "Grok",
    home: "https://grok.com/",
    hosts: &["grok.com"],
    input_selector: "textarea[placeholder*=\"chat\" i], input[placeholder*=\"chat\" i], textarea",
};

const GEMINI: ServiceInfo = ServiceInfo {
    id: "gemini",
    name: "Gemini",
    home: "https://gemini.google.com/app",
    hosts: &["gemini.google.com"],
    input_selector: "rich-textarea div[contenteditable=\"true\"], div.ql-editor[contenteditable=\"true\"]",
};

const OPENROUTER: ServiceInfo = ServiceInfo {
    id: "openrouter",
    name: "OpenRouter",
    home: "https://openrouter.ai/chat",
    hosts: &["openrouter.ai"],
    input_selector: "textarea[placeholder], textarea",
};

const T3: ServiceInfo = ServiceInfo {
    id: "t3",
    name: "T3 Chat",
    home: "https://t3.chat/",
    hosts: &["t3.chat"],
    input_selector: "textarea#chat-input, textarea[placeholder], textarea",
};

impl Service {
    pub const ALL: [Service; 6] = [
        Service::ChatGpt,
        Service::Claude,
        Service::Grok,
        Service::Gemini,
        Service::OpenRouter,
        Service::T3,
    ];

    fn info(self) -> &'static ServiceInfo {
        match self {
            Service::ChatGpt => &CHATGPT,
            Service::Claude => &CLAUDE,
            Service::Grok => &GROK,
            Service::Gemini => &GEMINI,
            Service::OpenRouter => &OPENROUTER,
            Service::T3 => &T3,
        }
    }

    /// Stable identifier used in menu ids and config values.
    pub fn id(self) -> &'static str {
        self.info().id
    }

    pub fn display_name(self) -> &'static str {
        self.info().name
    }

    pub fn input_selector(self) -> &'static str {
        self.info().input_selector
    }

    pub fn home_url(self) -> &'static str {
        self.info().home
    }

    /// Identify the service a URL belongs to by its host.
    /// Subdomains of a listed host match too.
    pub fn from_url(url: &Url) -> Option<Service> {
        let host = url.host_str()?;
        Service::ALL.into_iter().find(|s| {
            s.info()
                .hosts
                .iter()
                .any(|h| host == *h || host.strip_suffix(h).is_some_and(|rest| rest.ends_with('.')))
        })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Service::ALL
            .into_iter()
            .find(|svc| svc.id() == wanted || svc.display_name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown service: {s}"))
    }
}

/// Logical window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSize {
    Compact,
    Standard,
    Large,
    Wide,
}

impl WindowSize {
    pub const ALL: [WindowSize; 4] = [
        WindowSize::Compact,
        WindowSize::Standard,
        WindowSize::Large,
        WindowSize::Wide,
    ];

    pub fn id(self) -> &'static str {
        match self {
            WindowSize::Compact => "compact",
            WindowSize::Standard => "standard",
            WindowSize::Large => "large",
            WindowSize::Wide => "wide",
        }
    }

    pub fn size(self) -> Size {
        let (width, height) = match self {
            WindowSize::Compact => (800, 700),
            WindowSize::Standard => (1000, 900),
            WindowSize::Large => (1200, 1000),
            WindowSize::Wide => (1400, 1000),
        };
        Size { width, height }
    }

    pub fn label(self) -> String {
        let Size { width, height } = self.size();
        let name = match self {
            WindowSize::Compact => "Compact",
            WindowSize::Standard => "Standard",
            WindowSize::Large => "Large",
            WindowSize::Wide => "Wide",
        };
        format!("{name} ({width}\u{d7}{height})")
    }
}

impl FromStr for WindowSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        WindowSize::ALL
            .into_iter()
            .find(|p| {
                let Size { width, height } = p.size();
                p.id() == wanted || format!("{width}x{height}") == wanted
            })
            .ok_or_else(|| format!("unknown window size: {s}"))
    }
}
