//! Search-as-you-type suggestions.
//!
//! Every query change may start a request and nothing is cancelled, so
//! responses can arrive out of order. Each request is tagged with the
//! generation current when it started; a response is applied only if no
//! newer query (or a close) happened since.
//!
//! Failures are logged and leave an empty list: suggestions are a
//! convenience, not worth a toast.

use regex::{Captures, RegexBuilder};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{Backend, Suggestion};
use crate::catalog::url_with_query;
use crate::config::Settings;
use crate::dom::Page;

/// Element id of the search text input.
pub const SEARCH_INPUT_ID: &str = "search-input";
const HIGHLIGHT_OPEN: &str = r#"<strong class="text-lavender-deep">"#;
const HIGHLIGHT_CLOSE: &str = "</strong>";

/// Visible state of the search surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub open: bool,
    pub query: String,
    /// Server order, replaced wholesale.
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: SearchState,
    generation: u64,
}

/// Debounced header search with suggestions.
#[derive(Clone)]
pub struct SearchSuggester {
    backend: Arc<dyn Backend>,
    page: Arc<dyn Page>,
    inner: Arc<Mutex<Inner>>,
    min_query_len: usize,
    search_path: String,
}

impl SearchSuggester {
    pub fn new(backend: Arc<dyn Backend>, page: Arc<dyn Page>, settings: &Settings) -> Self {
        Self {
            backend,
            page,
            inner: Arc::new(Mutex::new(Inner::default())),
            min_query_len: settings.min_query_len,
            search_path: settings.search_path.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the query, suggestions and loading flag.
    pub fn state(&self) -> SearchState {
        self.lock().state.clone()
    }

    pub fn query(&self) -> String {
        self.lock().state.query.clone()
    }

    /// Suggestions for the latest query that finished.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.lock().state.suggestions.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    /// Show the search surface and focus its input on the next tick.
    pub async fn open(&self) {
        self.lock().state.open = true;
        tokio::task::yield_now().await;
        if self.lock().state.open {
            self.page.focus(SEARCH_INPUT_ID);
        }
    }

    /// Hide the surface, forgetting the query and its suggestions.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.state = SearchState::default();
    }

    /// React to the input changing to `query`.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state.query = query.clone();

            if query.chars().count() < self.min_query_len {
                inner.state.suggestions.clear();
                inner.state.loading = false;
                return;
            }
            inner.state.loading = true;
            inner.generation
        };

        let result = self.backend.search_suggest(&query).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(%query, "discarding stale suggestions");
            return;
        }
        match result {
            Ok(suggestions) => inner.state.suggestions = suggestions,
            Err(e) => {
                tracing::warn!("Failed to fetch suggestions for {:?}: {}", query, e);
                inner.state.suggestions.clear();
            }
        }
        inner.state.loading = false;
    }

    /// [`highlight_match`] against the current query.
    pub fn highlight_match(&self, suggestion: &str) -> String {
        highlight_match(suggestion, &self.query())
    }

    /// Full-page submission to the search results page.
    ///
    /// Returns `false` (and does nothing) for an empty query.
    pub fn submit(&self) -> bool {
        let query = self.query();
        if query.is_empty() {
            return false;
        }
        let url = url_with_query(&self.search_path, [("q", query.as_str())]);
        self.page.assign_location(&url);
        true
    }
}

/// Wrap every case-insensitive occurrence of `query` in `text` in emphasis.
///
/// `query` is matched literally; regex metacharacters in it have no effect.
pub fn highlight_match(text: &str, query: &str) -> String {
    if query.is_empty() {
        return text.to_string();
    }
    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::debug!("highlight pattern rejected: {}", e);
            return text.to_string();
        }
    };
    pattern
        .replace_all(text, |caps: &Captures| {
            format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0])
        })
        .into_owned()
}
