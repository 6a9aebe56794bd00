//! Tauri-backed window host.
//!
//! The main window is a bare window holding four child webviews, one per
//! `Surface`. Only the ones the current layout needs are shown.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tauri::webview::{NewWindowResponse, PageLoadEvent, WebviewBuilder};
use tauri::window::WindowBuilder;
use tauri::{AppHandle, LogicalPosition, LogicalSize, Manager, Url, Webview, WebviewUrl, Window, Wry};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, info, warn};

use crate::error::ShellError;
use crate::focus::{self, FocusOutcome, FocusPolicy, FocusSignal};
use crate::host::{placement, Surface, WindowHost};
use crate::pages;
use crate::service::{Service, Size};
use crate::shell::{self, ShellState};
use crate::split::Layout;

pub const MAIN_WINDOW: &str = "main";

/// Custom scheme serving locally composed pages.
pub const PAGE_SCHEME: &str = "quickai";

/// Timeout for the reachability check on a service page (seconds)
const REACHABILITY_TIMEOUT_SECS: u64 = 10;

/// Pages served at `quickai://localhost/<surface label>`.
#[derive(Clone, Default)]
pub struct PageStore {
    pages: Arc<RwLock<HashMap<String, String>>>,
    revision: Arc<AtomicU64>,
}

impl PageStore {
    fn publish(&self, name: &str, html: String) -> u64 {
        match self.pages.write() {
            Ok(mut pages) => pages.insert(name.to_string(), html),
            Err(poisoned) => poisoned.into_inner().insert(name.to_string(), html),
        };
        self.revision.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn get(&self, name: &str) -> Option<String> {
        match self.pages.read() {
            Ok(pages) => pages.get(name).cloned(),
            Err(poisoned) => poisoned.into_inner().get(name).cloned(),
        }
    }

    /// Response body for a request path on the page scheme.
    pub fn serve(&self, path: &str) -> String {
        self.get(path.trim_start_matches('/'))
            .unwrap_or_else(pages::blank)
    }
}

// custom schemes are exposed as http://<scheme>.localhost on Windows and Android
fn page_url(name: &str, revision: u64) -> Result<Url, ShellError> {
    #[cfg(any(windows, target_os = "android"))]
    let raw = format!("http://{PAGE_SCHEME}.localhost/{name}?rev={revision}");
    #[cfg(not(any(windows, target_os = "android")))]
    let raw = format!("{PAGE_SCHEME}://localhost/{name}?rev={revision}");
    Url::parse(&raw).map_err(|e| ShellError::Window(e.to_string()))
}

/// Ok when `url` answers at all. Only connect errors and timeouts count as
/// unreachable; any HTTP status, even an error one, means the site is up.
pub async fn check_reachable(client: &reqwest::Client, url: &str) -> Result<(), String> {
    match client.head(url).send().await {
        Ok(response) => {
            debug!("[window] {} answered {}", url, response.status());
            Ok(())
        }
        Err(e) if e.is_timeout() => Err(format!(
            "no answer within {REACHABILITY_TIMEOUT_SECS} seconds"
        )),
        Err(e) if e.is_connect() => {
            let mut cause: &dyn std::error::Error = &e;
            while let Some(source) = cause.source() {
                cause = source;
            }
            Err(format!("could not connect: {cause}"))
        }
        Err(e) => {
            debug!("[window] reachability of {} unknown: {}", url, e);
            Ok(())
        }
    }
}

pub struct TauriWindowHost {
    app: AppHandle,
    pages: PageStore,
    client: reqwest::Client,
    dock_visible: bool,
}

impl TauriWindowHost {
    pub fn new(app: AppHandle, pages: PageStore) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REACHABILITY_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            app,
            pages,
            client,
            dock_visible: false,
        }
    }

    fn window(&self) -> Result<Window, ShellError> {
        self.app
            .get_window(MAIN_WINDOW)
            .ok_or_else(|| ShellError::Window("main window does not exist".into()))
    }

    fn webview(&self, surface: Surface) -> Result<Webview, ShellError> {
        self.app
            .get_webview(surface.label())
            .ok_or_else(|| ShellError::Window(format!("{} does not exist", surface.label())))
    }

    fn navigate(&self, surface: Surface, url: Url) -> Result<(), ShellError> {
        let target = url.to_string();
        self.webview(surface)?
            .navigate(url)
            .map_err(|e| ShellError::NavigationFailed {
                url: target,
                reason: e.to_string(),
            })
    }

    fn builder(&self, surface: Surface, start: Url) -> WebviewBuilder<Wry> {
        let app = self.app.clone();
        WebviewBuilder::new(surface.label(), WebviewUrl::CustomProtocol(start))
            .on_page_load(move |webview, payload| {
                let Some(state) = webview.app_handle().try_state::<ShellState>() else {
                    return;
                };
                let url = payload.url().clone();
                match payload.event() {
                    PageLoadEvent::Started => state.with(|c| c.on_load_started(surface, &url)),
                    PageLoadEvent::Finished => state.with(|c| c.on_load_finished(surface, &url)),
                }
            })
            .on_new_window(move |url, _features| {
                // popups and target=_blank links go to the system browser
                if let Some(state) = app.try_state::<ShellState>() {
                    if let Err(e) = state.with(|c| c.open_external(url.as_str())) {
                        warn!("[window] could not open {} externally: {}", url, e);
                    }
                }
                NewWindowResponse::Deny
            })
    }
}

impl WindowHost for TauriWindowHost {
    fn create(&mut self, size: Size, title: &str) -> Result<(), ShellError> {
        let (width, height) = (f64::from(size.width), f64::from(size.height));
        let window = WindowBuilder::new(&self.app, MAIN_WINDOW)
            .title(title)
            .inner_size(width, height)
            .visible(false)
            .skip_taskbar(!self.dock_visible)
            .build()?;

        let start = page_url("blank", 0)?;
        for surface in Surface::ALL {
            let webview = window.add_child(
                self.builder(surface, start.clone()),
                LogicalPosition::new(0.0, 0.0),
                LogicalSize::new(width, height),
            )?;
            webview.hide()?;
        }
        info!("[window] main window created ({}x{})", size.width, size.height);
        Ok(())
    }

    fn exists(&self) -> bool {
        self.app.get_window(MAIN_WINDOW).is_some()
    }

    fn load_url(&mut self, surface: Surface, url: &str) -> Result<(), ShellError> {
        let parsed = Url::parse(url).map_err(|e| ShellError::NavigationFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!("[window] {} navigating to {}", surface.label(), parsed);
        self.navigate(surface, parsed)
    }

    fn load_html(&mut self, surface: Surface, html: String) -> Result<(), ShellError> {
        let revision = self.pages.publish(surface.label(), html);
        self.navigate(surface, page_url(surface.label(), revision)?)
    }

    fn watch_navigation(&mut self, surface: Surface, url: &str, navigation: u64) {
        let app = self.app.clone();
        let client = self.client.clone();
        let url = url.to_string();
        tauri::async_runtime::spawn(async move {
            let Err(reason) = check_reachable(&client, &url).await else {
                return;
            };
            let handle = app.clone();
            let report = move || shell::navigation_failed(&handle, surface, navigation, &url, &reason);
            if let Err(e) = app.run_on_main_thread(report) {
                warn!("[window] could not report failed navigation: {}", e);
            }
        });
    }

    fn arrange(&mut self, layout: &Layout) -> Result<(), ShellError> {
        for surface in Surface::ALL {
            let webview = self.webview(surface)?;
            match placement(layout, surface) {
                Some(rect) => {
                    webview.set_position(LogicalPosition::new(rect.x, rect.y))?;
                    webview.set_size(LogicalSize::new(rect.width, rect.height))?;
                    webview.show()?;
                }
                None => webview.hide()?,
            }
        }
        Ok(())
    }

    fn resize(&mut self, size: Size) -> Result<(), ShellError> {
        self.window()?
            .set_size(LogicalSize::new(f64::from(size.width), f64::from(size.height)))?;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), ShellError> {
        self.window()?.set_title(title)?;
        Ok(())
    }

    fn show(&mut self) -> Result<(), ShellError> {
        self.window()?.show()?;
        Ok(())
    }

    fn hide(&mut self) -> Result<(), ShellError> {
        self.window()?.hide()?;
        Ok(())
    }

    fn focus(&mut self, surface: Surface) -> Result<(), ShellError> {
        self.window()?.set_focus()?;
        self.webview(surface)?.set_focus()?;
        Ok(())
    }

    fn run_script(&mut self, surface: Surface, script: &str) -> Result<(), ShellError> {
        self.webview(surface)?.eval(script)?;
        Ok(())
    }

    fn start_focus_loop(&mut self, service: Service, signal: Arc<FocusSignal>, policy: FocusPolicy) {
        let Ok(webview) = self.webview(Surface::Single) else {
            return;
        };
        let script = focus::focus_script(service, signal.generation());
        tauri::async_runtime::spawn(async move {
            let outcome = focus::acquire(service, signal, policy, |attempt| {
                debug!("[focus] {} attempt {}", service, attempt);
                webview.eval(&script).is_ok()
            })
            .await;
            match outcome {
                Ok(FocusOutcome::Acquired { attempts }) => {
                    debug!("[focus] {} input focused after {} attempts", service, attempts);
                }
                Ok(FocusOutcome::Cancelled) => debug!("[focus] {} cancelled", service),
                Err(e) => warn!("[focus] {}", e),
            }
        });
    }

    fn open_external(&self, url: &str) -> Result<(), ShellError> {
        info!("[window] opening {} in the default browser", url);
        self.app
            .opener()
            .open_url(url, None::<&str>)
            .map_err(|e| ShellError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn set_dock_visible(&mut self, visible: bool) -> Result<(), ShellError> {
        self.dock_visible = visible;

        #[cfg(target_os = "macos")]
        {
            let policy = if visible {
                tauri::ActivationPolicy::Regular
            } else {
                tauri::ActivationPolicy::Accessory
            };
            self.app.set_activation_policy(policy)?;
        }

        #[cfg(not(target_os = "macos"))]
        if let Some(window) = self.app.get_window(MAIN_WINDOW) {
            window.set_skip_taskbar(!visible)?;
        }

        info!("[window] dock icon {}", if visible { "shown" } else { "hidden" });
        Ok(())
    }
}
