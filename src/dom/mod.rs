//! Headless page model.
//!
//! Widgets touch the page only through these types, so the same logic runs
//! against a real browser binding or the in-memory [`MemoryPage`].

mod button;
mod class_list;
mod page;

pub use button::{ActionButton, ButtonState, BUSY_CLASS};
pub use class_list::ClassList;
pub use page::{MemoryPage, Page};

/// A user-initiated DOM event whose default browser action can be suppressed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    default_prevented: bool,
}

impl DomEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
