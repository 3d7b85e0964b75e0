//! Per-item action controls (add to cart, wishlist, comparison).

use std::sync::{Arc, Mutex, MutexGuard};

use super::ClassList;

/// Class marking a control whose request is in flight.
pub const BUSY_CLASS: &str = "is-loading";

/// Visible state of one action control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Value of the control's `data-product-id` attribute.
    pub product_id: Option<String>,
    pub classes: ClassList,
    pub disabled: bool,
    /// Classes of the control's `i.icon-default` child, if it has one.
    pub icon: Option<ClassList>,
}

/// Shared handle to an action control.
///
/// Cloning yields another handle to the same control, the way two closures
/// can capture the same DOM node.
#[derive(Debug, Clone, Default)]
pub struct ActionButton {
    state: Arc<Mutex<ButtonState>>,
}

impl ActionButton {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self::from_state(ButtonState {
            product_id: Some(product_id.into()),
            ..ButtonState::default()
        })
    }

    pub fn from_state(state: ButtonState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Give the control an icon child with the given class attribute.
    pub fn with_icon(self, classes: &str) -> Self {
        self.lock().icon = Some(ClassList::parse(classes));
        self
    }

    fn lock(&self) -> MutexGuard<'_, ButtonState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The `data-product-id` attribute, if any.
    pub fn product_id(&self) -> Option<String> {
        self.lock().product_id.clone().filter(|id| !id.is_empty())
    }

    /// True while a request started from this control is outstanding.
    pub fn is_busy(&self) -> bool {
        let state = self.lock();
        state.disabled || state.classes.contains(BUSY_CLASS)
    }

    /// Mark the control busy unless it already is. Returns whether this
    /// call took it.
    pub fn try_set_busy(&self) -> bool {
        let mut state = self.lock();
        if state.disabled || state.classes.contains(BUSY_CLASS) {
            return false;
        }
        state.classes.toggle(BUSY_CLASS, true);
        state.disabled = true;
        true
    }

    pub fn set_busy(&self, busy: bool) {
        let mut state = self.lock();
        state.classes.toggle(BUSY_CLASS, busy);
        state.disabled = busy;
    }

    pub fn is_disabled(&self) -> bool {
        self.lock().disabled
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.lock().classes.contains(class)
    }

    /// Mutate the icon's classes. Returns `None` when there is no icon.
    pub fn update_icon<R>(&self, f: impl FnOnce(&mut ClassList) -> R) -> Option<R> {
        self.lock().icon.as_mut().map(f)
    }

    pub fn icon(&self) -> Option<ClassList> {
        self.lock().icon.clone()
    }

    pub fn snapshot(&self) -> ButtonState {
        self.lock().clone()
    }
}
