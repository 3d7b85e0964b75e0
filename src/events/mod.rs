//! Page-wide event bus.
//!
//! Widgets on a storefront page never call each other. Every cross-widget
//! effect is an event emitted on the [`EventBus`]:
//!
//! ```text
//!   ActionDispatcher ──┐                      ┌──► ToastQueue
//!   QuickViewLoader  ──┼──► EventBus::emit ───┼──► cart / wishlist counters
//!   pagination links ──┘   (sync, in order)   └──► CatalogFilter
//!                                │
//!                                └──► tap() (async observers, e.g. terminal)
//! ```
//!
//! ## Key Components
//!
//! - [`PageEvent`]: the named events and their payloads (the wire contract)
//! - [`EventBus`]: name → ordered subscriber list, plus a broadcast tap

mod bus;
mod types;

pub use bus::{BusError, EventBus, EventReceiver};
pub use types::*;
