//! Storefront Sync Library
//!
//! Client-side interaction layer of a storefront page: independent widgets
//! that talk to a JSON/HTML backend and keep each other consistent through a
//! typed event bus, never by calling one another.
//!
//! ## Main Components
//!
//! - [`events`] - Typed page event bus (`show-toast`, count updates, `filter-navigate`)
//! - [`toast`] - De-duplicated, self-draining notification queue
//! - [`actions`] - Cart, wishlist and comparison buttons
//! - [`search`] - Search-as-you-type suggestions
//! - [`catalog`] - AJAX catalog filtering and pagination
//! - [`quick_view`] - Quick-view modal loader and selection
//! - [`api`] - Backend contract and its reqwest implementation
//! - [`dom`] - Page surface the widgets mutate
//! - [`config`] - Settings and config paths
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use storefront_sync::{HttpBackend, MemoryPage, Settings, Storefront};
//!
//! let settings = Settings::load_default()?;
//! let backend = Arc::new(HttpBackend::new(&settings)?);
//! let page = Arc::new(MemoryPage::new("/catalog/"));
//! let storefront = Storefront::new(backend, page, &settings);
//! storefront.search().set_query("lamp").await;
//! ```

pub mod actions;
pub mod api;
pub mod catalog;
pub mod config;
pub mod dom;
pub mod events;
pub mod quick_view;
pub mod search;
pub mod storefront;
pub mod toast;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use actions::{ActionDispatcher, ActionOutcome};
pub use api::{ApiError, Backend, Entity, HttpBackend, ProductDetail, Suggestion};
pub use catalog::{CatalogFilter, FilterForm, NavigationOutcome};
pub use config::{Settings, XdgDirs};
pub use dom::{ActionButton, DomEvent, MemoryPage, Page};
pub use events::{EventBus, EventName, PageEvent, ToastKind};
pub use quick_view::{format_price, QuickViewLoader, SelectedProduct};
pub use search::SearchSuggester;
pub use storefront::Storefront;
pub use toast::{TerminalRenderer, ToastQueue};
