//! Transient notifications.
//!
//! [`ToastQueue`] listens for `show-toast` on the bus and keeps an ordered,
//! self-draining list of messages. Each toast is shown for
//! `toast_display_ms`, then hidden, then dropped `toast_grace_ms` later so
//! the exit animation can finish.

mod renderer;

pub use renderer::{RenderStyle, TerminalRenderer};

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::Timing;
use crate::events::{EventBus, EventName, PageEvent, ToastKind};

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    /// False once the exit animation has started.
    pub visible: bool,
}

#[derive(Debug, Default)]
struct QueueState {
    toasts: Vec<Toast>,
    next_id: u64,
}

/// Owner of every toast on the page.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    state: Arc<Mutex<QueueState>>,
    display: Duration,
    grace: Duration,
}

impl ToastQueue {
    /// An empty queue using the display and grace periods from `timing`.
    pub fn new(timing: &Timing) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState::default())),
            display: timing.toast_display(),
            grace: timing.toast_grace(),
        }
    }

    /// Subscribe to `show-toast` events.
    pub fn attach(&self, bus: &EventBus) {
        let queue = self.clone();
        bus.subscribe(EventName::ShowToast, move |event| {
            if let PageEvent::ShowToast(payload) = event {
                queue.add(&payload.message, payload.kind);
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a toast and schedule its removal.
    ///
    /// Returns `None` when a toast with the same text is still queued.
    pub fn add(&self, message: &str, kind: ToastKind) -> Option<u64> {
        let id = {
            let mut state = self.lock();
            if state.toasts.iter().any(|t| t.message == message) {
                tracing::debug!(message, "duplicate toast suppressed");
                return None;
            }
            let id = state.next_id;
            state.next_id += 1;
            state.toasts.push(Toast {
                id,
                message: message.to_string(),
                kind,
                visible: true,
            });
            id
        };

        let queue = self.clone();
        let display = self.display;
        schedule(display, move || queue.remove(id));
        Some(id)
    }

    /// Hide the toast now and drop it after the grace period.
    pub fn remove(&self, id: u64) {
        {
            let mut state = self.lock();
            let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) else {
                return;
            };
            toast.visible = false;
        }

        let queue = self.clone();
        schedule(self.grace, move || {
            queue.lock().toasts.retain(|t| t.id != id);
        });
    }

    /// All queued toasts in insertion order, hidden ones included.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    /// Toasts on screen, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.lock()
            .toasts
            .iter()
            .filter(|t| t.visible)
            .cloned()
            .collect()
    }

    /// Number of toasts on screen.
    pub fn len(&self) -> usize {
        self.lock().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().toasts.is_empty()
    }
}

/// Run `f` after `delay` on the current tokio runtime.
fn schedule(delay: Duration, f: impl FnOnce() + Send + 'static) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                f();
            });
        }
        Err(_) => tracing::warn!("No async runtime, toast timer not scheduled"),
    }
}
