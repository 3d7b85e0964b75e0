//! Quick-view modal.
//!
//! Triggers write to the shared [`SelectedProduct`]; the [`QuickViewLoader`]
//! watches it and keeps the modal's product in step. Every id change fetches
//! afresh, nothing is cached.

mod gallery;
mod selection;

pub use gallery::{format_price, ProductGallery};
pub use selection::SelectedProduct;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{Backend, ProductDetail};
use crate::config::Settings;
use crate::events::{EventBus, PageEvent};

#[derive(Debug, Default)]
struct LoaderState {
    loading: bool,
    product: Option<ProductDetail>,
    generation: u64,
}

/// Loads the product behind the current quick-view selection.
#[derive(Clone)]
pub struct QuickViewLoader {
    backend: Arc<dyn Backend>,
    bus: EventBus,
    selection: SelectedProduct,
    state: Arc<Mutex<LoaderState>>,
    load_error: String,
}

impl QuickViewLoader {
    /// Build a loader over `selection`. Call [`attach`](Self::attach) to start watching.
    pub fn new(
        backend: Arc<dyn Backend>,
        bus: EventBus,
        selection: SelectedProduct,
        settings: &Settings,
    ) -> Self {
        Self {
            backend,
            bus,
            selection,
            state: Arc::new(Mutex::new(LoaderState::default())),
            load_error: settings.messages.product_load_error.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The loaded product, if the current load has finished.
    pub fn product(&self) -> Option<ProductDetail> {
        self.lock().product.clone()
    }

    pub fn selection(&self) -> &SelectedProduct {
        &self.selection
    }

    /// Watch the selection. Loads run on the current tokio runtime.
    pub fn attach(&self) {
        let loader = self.clone();
        self.selection.subscribe(move |id| match id {
            None => loader.discard(),
            Some(id) => {
                let Ok(handle) = tokio::runtime::Handle::try_current() else {
                    tracing::warn!("No async runtime, cannot load product {}", id);
                    return;
                };
                let loader = loader.clone();
                let id = id.to_string();
                handle.spawn(async move {
                    loader.load(&id).await;
                });
            }
        });
    }

    /// React to the selected id becoming `id`.
    pub async fn on_selection_changed(&self, id: Option<&str>) {
        match id {
            Some(id) => self.load(id).await,
            None => self.discard(),
        }
    }

    /// Drop the product at once. An in-flight load for the old id is
    /// ignored when it lands.
    fn discard(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.product = None;
        state.loading = false;
    }

    async fn load(&self, product_id: &str) {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.product = None;
            state.generation
        };
        tracing::debug!(product_id, "loading quick view");

        let result = self.backend.product_detail(product_id).await;

        let failed = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!(product_id, "discarding stale product");
                return;
            }
            state.loading = false;
            match result {
                Ok(product) => {
                    state.product = Some(product);
                    false
                }
                Err(e) => {
                    tracing::warn!("Quick view error for product {}: {}", product_id, e);
                    true
                }
            }
        };

        if failed {
            self.selection.close();
            self.bus.emit(PageEvent::error(self.load_error.clone()));
        }
    }
}
