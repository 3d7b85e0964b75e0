//! One page session with every widget wired to a shared bus.

use std::sync::Arc;

use crate::actions::ActionDispatcher;
use crate::api::Backend;
use crate::catalog::CatalogFilter;
use crate::config::Settings;
use crate::dom::Page;
use crate::events::EventBus;
use crate::quick_view::{QuickViewLoader, SelectedProduct};
use crate::search::SearchSuggester;
use crate::toast::ToastQueue;

/// The widgets of one page, built once and sharing one [`EventBus`].
///
/// Widgets never reach each other through this struct; it only owns them.
pub struct Storefront {
    bus: EventBus,
    toasts: ToastQueue,
    actions: ActionDispatcher,
    search: SearchSuggester,
    catalog: CatalogFilter,
    quick_view: QuickViewLoader,
}

impl Storefront {
    pub fn new(backend: Arc<dyn Backend>, page: Arc<dyn Page>, settings: &Settings) -> Self {
        let bus = EventBus::new();

        let toasts = ToastQueue::new(&settings.timing);
        toasts.attach(&bus);

        let catalog = CatalogFilter::new(backend.clone(), page.clone(), settings);
        catalog.attach(&bus);
        catalog.on_hydrate(|fragment| {
            tracing::debug!(
                controls = fragment.action_buttons().len(),
                "catalog fragment hydrated"
            );
        });

        let selection = SelectedProduct::new(settings.timing.modal_close_delay());
        let quick_view = QuickViewLoader::new(backend.clone(), bus.clone(), selection, settings);
        quick_view.attach();

        let actions = ActionDispatcher::new(backend.clone(), page.clone(), bus.clone(), settings);
        let search = SearchSuggester::new(backend, page, settings);

        Self {
            bus,
            toasts,
            actions,
            search,
            catalog,
            quick_view,
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn actions(&self) -> &ActionDispatcher {
        &self.actions
    }

    pub fn search(&self) -> &SearchSuggester {
        &self.search
    }

    pub fn catalog(&self) -> &CatalogFilter {
        &self.catalog
    }

    pub fn quick_view(&self) -> &QuickViewLoader {
        &self.quick_view
    }

    pub fn selection(&self) -> &SelectedProduct {
        self.quick_view.selection()
    }
}
