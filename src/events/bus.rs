//! Event bus for cross-widget notifications.

use super::{EventName, PageEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;

type Handler = Arc<dyn Fn(&PageEvent) + Send + Sync>;

/// Receiver half of the bus tap.
pub struct EventReceiver {
    rx: broadcast::Receiver<PageEvent>,
}

impl EventReceiver {
    /// Receive the next event.
    pub async fn recv(&mut self) -> Result<PageEvent, BusError> {
        self.rx.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => BusError::Closed,
            broadcast::error::RecvError::Lagged(n) => BusError::Lagged(n),
        })
    }

    /// Try to receive an event without waiting.
    pub fn try_recv(&mut self) -> Result<Option<PageEvent>, BusError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(BusError::Closed),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Err(BusError::Lagged(n)),
        }
    }
}

struct BusInner {
    handlers: Mutex<HashMap<EventName, Vec<Handler>>>,
    tap: broadcast::Sender<PageEvent>,
}

/// One bus per page session. Cloning shares the same subscriber table.
///
/// `emit` runs every handler subscribed to the event's name synchronously,
/// in subscription order, before returning. Events emitted before a handler
/// subscribes are not replayed to it.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (tap, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(BusInner {
                handlers: Mutex::new(HashMap::new()),
                tap,
            }),
        }
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<EventName, Vec<Handler>>> {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a handler for the lifetime of the bus.
    pub fn subscribe<F>(&self, name: EventName, handler: F)
    where
        F: Fn(&PageEvent) + Send + Sync + 'static,
    {
        self.handlers().entry(name).or_default().push(Arc::new(handler));
    }

    /// Deliver an event to every handler subscribed to its name.
    pub fn emit(&self, event: PageEvent) {
        let name = event.name();
        // Handlers may emit in turn, so the table is not held while they run.
        let handlers = self.handlers().get(&name).cloned().unwrap_or_default();
        tracing::debug!(event = %name, handlers = handlers.len(), "emit");

        for handler in &handlers {
            handler(&event);
        }

        let _ = self.inner.tap.send(event);
    }

    /// Observe every event asynchronously, regardless of name.
    pub fn tap(&self) -> EventReceiver {
        EventReceiver {
            rx: self.inner.tap.subscribe(),
        }
    }

    /// Number of handlers registered under `name`.
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.handlers().get(&name).map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus tap errors.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Channel closed")]
    Closed,
    #[error("Lagged behind by {0} events")]
    Lagged(u64),
}
