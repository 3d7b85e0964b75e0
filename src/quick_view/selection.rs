use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type Listener = Arc<dyn Fn(Option<&str>) + Send + Sync>;

#[derive(Debug, Default)]
struct SelectionState {
    id: Option<String>,
    open: bool,
    /// Bumped by every select/close/clear so a pending delayed clear can
    /// tell it has been overtaken.
    generation: u64,
}

/// The product shown in the quick-view modal, shared by every "quick view"
/// trigger and the loader.
///
/// A set id always means the modal is open. Closing hides the modal at once
/// but keeps the id for `modal_close_delay` so the closing animation does
/// not flash empty content. Listeners hear about id changes only.
#[derive(Clone)]
pub struct SelectedProduct {
    state: Arc<Mutex<SelectionState>>,
    listeners: Arc<Mutex<Vec<Listener>>>,
    close_delay: Duration,
}

impl SelectedProduct {
    pub fn new(close_delay: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(SelectionState::default())),
            listeners: Arc::new(Mutex::new(Vec::new())),
            close_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The selected id, kept during the close delay.
    pub fn current(&self) -> Option<String> {
        self.lock().id.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Called with the new id after every change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::new(listener));
    }

    /// Open the modal on `product_id`.
    ///
    /// Reopening a closed modal on the id it still holds counts as a change,
    /// so listeners load it again.
    pub fn select(&self, product_id: impl Into<String>) {
        let product_id = product_id.into();
        let changed = {
            let mut state = self.lock();
            let reopened = !state.open;
            state.generation += 1;
            state.open = true;
            if state.id.as_deref() == Some(product_id.as_str()) {
                reopened
            } else {
                state.id = Some(product_id.clone());
                true
            }
        };
        if changed {
            self.notify(Some(&product_id));
        }
    }

    /// Hide the modal now, forget the id after the close delay unless
    /// something is selected in the meantime.
    pub fn close(&self) {
        let generation = {
            let mut state = self.lock();
            state.open = false;
            state.generation += 1;
            state.generation
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            self.clear_if_current(generation);
            return;
        };
        let selection = self.clone();
        let delay = self.close_delay;
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            selection.clear_if_current(generation);
        });
    }

    /// Hide the modal and forget the id immediately.
    pub fn clear(&self) {
        let generation = {
            let mut state = self.lock();
            state.open = false;
            state.generation += 1;
            state.generation
        };
        self.clear_if_current(generation);
    }

    fn clear_if_current(&self, generation: u64) {
        let cleared = {
            let mut state = self.lock();
            state.generation == generation && state.id.take().is_some()
        };
        if cleared {
            self.notify(None);
        }
    }

    fn notify(&self, id: Option<&str>) {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for listener in &listeners {
            listener(id);
        }
    }
}

impl std::fmt::Debug for SelectedProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SelectedProduct")
            .field("id", &state.id)
            .field("open", &state.open)
            .finish()
    }
}
