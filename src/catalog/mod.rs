//! Catalog filtering and pagination without full page loads.
//!
//! Both the filter form and the pagination links end up in
//! [`CatalogFilter::navigate`], which fetches the target page, splices its
//! content container into the current page and rewrites history. When any of
//! that fails the page falls back to a plain navigation, so the user always
//! lands on a correct page.
//!
//! The content container belongs to the catalog while a navigation runs. If
//! a newer navigation starts before an older one lands, the older result is
//! dropped.

mod fragment;

pub use fragment::{extract_inner_html, Fragment, FragmentError};

use reqwest::Url;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

use crate::api::{ApiError, Backend};
use crate::config::Settings;
use crate::dom::{DomEvent, Page};
use crate::events::{EventBus, EventName, PageEvent};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error("Current page has no element with id {0:?}")]
    NoTarget(String),
}

/// How a navigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Fragment spliced in and history updated.
    Swapped,
    /// Fell back to a full page load.
    Reloaded,
    /// A newer navigation started first; this one changed nothing.
    Superseded,
}

/// Serialized filter form fields, in document order. Repeated names (e.g.
/// several checked brands) are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    fields: Vec<(String, String)>,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Repeated names are kept.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Scratch URL whose query serializer does the form encoding.
static FORM_SCRATCH: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("scratch URL should parse"));

/// `path?k=v&...` with `application/x-www-form-urlencoded` pairs, or just
/// `path` when there are none.
pub fn url_with_query<'a>(path: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut scratch = FORM_SCRATCH.clone();
    scratch.query_pairs_mut().extend_pairs(pairs);
    match scratch.query() {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path.to_string(),
    }
}

type Hydrator = Arc<dyn Fn(&Fragment) + Send + Sync>;

#[derive(Debug, Default)]
struct CatalogState {
    loading: bool,
    generation: u64,
}

#[derive(Clone)]
/// Filter form, sort select and pagination for the catalog listing.
///
/// Swaps the listing container in place; only the latest navigation lands.
pub struct CatalogFilter {
    backend: Arc<dyn Backend>,
    page: Arc<dyn Page>,
    state: Arc<Mutex<CatalogState>>,
    hydrators: Arc<Mutex<Vec<Hydrator>>>,
    container_id: String,
    overlay_delay: Duration,
}

impl CatalogFilter {
    /// Build a filter that swaps the configured catalog container.
    pub fn new(backend: Arc<dyn Backend>, page: Arc<dyn Page>, settings: &Settings) -> Self {
        Self {
            backend,
            page,
            state: Arc::new(Mutex::new(CatalogState::default())),
            hydrators: Arc::new(Mutex::new(Vec::new())),
            container_id: settings.content_container_id.clone(),
            overlay_delay: settings.timing.overlay_delay(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Drives the loading overlay.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Register a callback that re-initializes the widgets living inside a
    /// freshly spliced fragment.
    pub fn on_hydrate<F>(&self, hydrate: F)
    where
        F: Fn(&Fragment) + Send + Sync + 'static,
    {
        self.hydrators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::new(hydrate));
    }

    /// Navigate on every `filter-navigate` event.
    pub fn attach(&self, bus: &EventBus) {
        let catalog = self.clone();
        bus.subscribe(EventName::FilterNavigate, move |event| {
            let PageEvent::FilterNavigate(payload) = event else {
                return;
            };
            let Ok(handle) = tokio::runtime::Handle::try_current() else {
                tracing::warn!("No async runtime, loading {} directly", payload.url);
                catalog.page.assign_location(&payload.url);
                return;
            };
            let catalog = catalog.clone();
            let url = payload.url.clone();
            handle.spawn(async move {
                catalog.navigate(&url).await;
            });
        });
    }

    /// Intercept a filter form submission.
    pub async fn apply_filters(&self, event: &mut DomEvent, form: &FilterForm) -> NavigationOutcome {
        event.prevent_default();
        let url = url_with_query(&self.page.pathname(), form.fields());
        self.navigate(&url).await
    }

    /// Load `url` into the content container.
    pub async fn navigate(&self, url: &str) -> NavigationOutcome {
        self.load(url, true).await
    }

    /// Back/forward landed on `url`. Fragments are not cached, so the page
    /// is fetched again; history already points at `url`.
    pub async fn on_history_pop(&self, url: &str) -> NavigationOutcome {
        self.load(url, false).await
    }

    async fn load(&self, url: &str, push_history: bool) -> NavigationOutcome {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.loading = true;
            state.generation
        };
        tracing::debug!(url, "catalog navigation started");

        let outcome = match self.swap(url, generation, push_history).await {
            Ok(outcome) => outcome,
            Err(_) if self.is_superseded(generation) => NavigationOutcome::Superseded,
            Err(e) => {
                tracing::warn!("Filter/pagination error, reloading {}: {}", url, e);
                self.page.assign_location(url);
                NavigationOutcome::Reloaded
            }
        };

        tokio::time::sleep(self.overlay_delay).await;
        let mut state = self.lock();
        if state.generation == generation {
            state.loading = false;
        }
        outcome
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.lock().generation != generation
    }

    async fn swap(
        &self,
        url: &str,
        generation: u64,
        push_history: bool,
    ) -> Result<NavigationOutcome, CatalogError> {
        let document = self.backend.fetch_page(url).await?;
        let fragment = Fragment::extract(&document, &self.container_id)?;

        if self.is_superseded(generation) {
            tracing::debug!(url, "newer navigation started, dropping fragment");
            return Ok(NavigationOutcome::Superseded);
        }
        if !self.page.replace_inner_html(&self.container_id, fragment.html()) {
            return Err(CatalogError::NoTarget(self.container_id.clone()));
        }

        let hydrators = self
            .hydrators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        for hydrate in &hydrators {
            hydrate(&fragment);
        }

        if push_history {
            self.page.push_history(url);
        }
        Ok(NavigationOutcome::Swapped)
    }
}

/// Handle a click on a pagination link inside the fragment: suppress the
/// link's own navigation and hand the target to the catalog via the bus.
pub fn follow_pagination_link(bus: &EventBus, event: &mut DomEvent, href: &str) {
    event.prevent_default();
    bus.emit(PageEvent::navigate(href));
}
