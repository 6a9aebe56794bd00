//! Chat input focus acquisition.
//!
//! After a single-service page finishes loading, the shell injects a small
//! script that looks for the service's input element and focuses it. The
//! page may still be hydrating, so the script is retried on a timer until the
//! page reports success through the `focus_acquired` command, the attempt
//! budget runs out, or the attempt loop is cancelled by a newer navigation or the
//! window closing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::ShellError;
use crate::service::Service;

/// Maximum script injections per page load
const MAX_ATTEMPTS: u32 = 10;

/// Delay between injections (ms)
const RETRY_INTERVAL_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for FocusPolicy {
    fn default() -> Self {
        Self {
            attempts: MAX_ATTEMPTS,
            interval: Duration::from_millis(RETRY_INTERVAL_MS),
        }
    }
}

/// Shared between the controller and one running attempt loop.
#[derive(Debug)]
pub struct FocusSignal {
    generation: u64,
    cancelled: AtomicBool,
    acquired: AtomicBool,
}

impl FocusSignal {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: AtomicBool::new(false),
            acquired: AtomicBool::new(false),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn mark_acquired(&self) {
        self.acquired.store(true, Ordering::SeqCst);
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }
}

/// Hands out one signal per page load and cancels the previous one.
#[derive(Debug, Default)]
pub struct FocusTracker {
    next_generation: u64,
    current: Option<Arc<FocusSignal>>,
}

impl FocusTracker {
    pub fn start(&mut self) -> Arc<FocusSignal> {
        self.cancel();
        self.next_generation += 1;
        let signal = Arc::new(FocusSignal::new(self.next_generation));
        self.current = Some(signal.clone());
        signal
    }

    pub fn cancel(&mut self) {
        if let Some(signal) = self.current.take() {
            signal.cancel();
        }
    }

    /// Record a success report from the page. Stale generations are ignored.
    pub fn acknowledge(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(signal) if signal.generation() == generation && !signal.is_cancelled() => {
                signal.mark_acquired();
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// The page reported success after this many injections.
    Acquired { attempts: u32 },
    Cancelled,
}

/// Run the retry loop. `attempt` injects the focus script once and returns
/// `false` when the window is gone, which ends the loop like a cancel.
pub async fn acquire<F>(
    service: Service,
    signal: Arc<FocusSignal>,
    policy: FocusPolicy,
    mut attempt: F,
) -> Result<FocusOutcome, ShellError>
where
    F: FnMut(u32) -> bool,
{
    for n in 1..=policy.attempts {
        if signal.is_cancelled() {
            return Ok(FocusOutcome::Cancelled);
        }
        if signal.is_acquired() {
            return Ok(FocusOutcome::Acquired { attempts: n - 1 });
        }
        if !attempt(n) {
            signal.cancel();
            return Ok(FocusOutcome::Cancelled);
        }
        sleep(policy.interval).await;
    }

    if signal.is_acquired() {
        Ok(FocusOutcome::Acquired {
            attempts: policy.attempts,
        })
    } else if signal.is_cancelled() {
        Ok(FocusOutcome::Cancelled)
    } else {
        Err(ShellError::FocusAcquisitionTimedOut {
            service,
            attempts: policy.attempts,
        })
    }
}

/// Script injected on each attempt. It focuses the first element matching
/// the service's selector and reports back once per generation.
pub fn focus_script(service: Service, generation: u64) -> String {
    let selector = serde_json::to_string(service.input_selector()).unwrap_or_else(|_| "\"textarea\"".into());
    format!(
        r#"(function() {{
  var gen = {generation};
  var root = document.documentElement;
  if (!root || root.dataset.quickAiFocused === String(gen)) return;
  var el = document.querySelector({selector});
  if (!el) return;
  el.focus();
  if (document.activeElement !== el) return;
  root.dataset.quickAiFocused = String(gen);
  var ipc = window.__TAURI_INTERNALS__;
  if (ipc && ipc.invoke) {{
    ipc.invoke('focus_acquired', {{ generation: gen }}).catch(function() {{}});
  }}
}})();"#
    )
}
