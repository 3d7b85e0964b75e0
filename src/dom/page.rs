//! The page surface the widgets mutate.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Operations a widget may perform on the current page.
pub trait Page: Send + Sync {
    /// `window.location.pathname`.
    fn pathname(&self) -> String;

    /// Content of `<meta name="...">`.
    fn meta(&self, name: &str) -> Option<String>;

    /// Replace the inner markup of the element with `container_id`.
    /// Returns `false` if the page has no such element.
    fn replace_inner_html(&self, container_id: &str, html: &str) -> bool;

    /// Point the address bar at `url` without reloading.
    fn push_history(&self, url: &str);

    /// Full synchronous navigation to `url`.
    fn assign_location(&self, url: &str);

    /// Move keyboard focus to the element with `element_id`.
    fn focus(&self, element_id: &str);
}

#[derive(Debug, Default)]
struct PageState {
    pathname: String,
    meta: HashMap<String, String>,
    containers: HashMap<String, String>,
    history: Vec<String>,
    navigations: Vec<String>,
    focused: Option<String>,
}

/// In-memory page used by the terminal driver and by tests.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

fn path_of(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

impl MemoryPage {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(PageState {
                pathname: pathname.into(),
                ..PageState::default()
            }),
        }
    }

    pub fn with_meta(self, name: &str, content: &str) -> Self {
        self.lock().meta.insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_container(self, id: &str, html: &str) -> Self {
        self.lock().containers.insert(id.to_string(), html.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn container(&self, id: &str) -> Option<String> {
        self.lock().containers.get(id).cloned()
    }

    /// URLs pushed onto history, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.clone()
    }

    /// URLs the page fully navigated to, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    pub fn focused(&self) -> Option<String> {
        self.lock().focused.clone()
    }
}

impl Page for MemoryPage {
    fn pathname(&self) -> String {
        self.lock().pathname.clone()
    }

    fn meta(&self, name: &str) -> Option<String> {
        self.lock().meta.get(name).cloned()
    }

    fn replace_inner_html(&self, container_id: &str, html: &str) -> bool {
        match self.lock().containers.get_mut(container_id) {
            Some(content) => {
                *content = html.to_string();
                true
            }
            None => false,
        }
    }

    fn push_history(&self, url: &str) {
        let mut state = self.lock();
        state.pathname = path_of(url).to_string();
        state.history.push(url.to_string());
    }

    fn assign_location(&self, url: &str) {
        let mut state = self.lock();
        state.pathname = path_of(url).to_string();
        state.navigations.push(url.to_string());
    }

    fn focus(&self, element_id: &str) {
        self.lock().focused = Some(element_id.to_string());
    }
}
