//! Test doubles shared by the widget tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ActionRequest, ActionResponse, ApiError, Backend, ProductDetail, Suggestion};
use crate::events::{EventBus, EventName, PageEvent};

type Scripted<T> = (Duration, Result<T, ApiError>);

/// Backend whose answers (and their latency) are scripted up front.
///
/// Unscripted calls fail with a transport error.
#[derive(Default)]
pub struct ScriptedBackend {
    suggestions: Mutex<HashMap<String, Scripted<Vec<Suggestion>>>>,
    products: Mutex<HashMap<String, Scripted<ProductDetail>>>,
    actions: Mutex<VecDeque<Scripted<ActionResponse>>>,
    pages: Mutex<HashMap<String, Scripted<String>>>,
    calls: Mutex<Vec<String>>,
    csrf_tokens: Mutex<Vec<Option<String>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggest(self, query: &str, delay_ms: u64, result: Result<Vec<Suggestion>, ApiError>) -> Self {
        self.suggestions
            .lock()
            .unwrap()
            .insert(query.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    pub fn product(self, id: &str, delay_ms: u64, result: Result<ProductDetail, ApiError>) -> Self {
        self.products
            .lock()
            .unwrap()
            .insert(id.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    /// Queue the answer to the next action call.
    pub fn action(self, delay_ms: u64, result: Result<ActionResponse, ApiError>) -> Self {
        self.actions
            .lock()
            .unwrap()
            .push_back((Duration::from_millis(delay_ms), result));
        self
    }

    pub fn page(self, url: &str, delay_ms: u64, result: Result<String, ApiError>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    /// Every request made so far, as `METHOD path`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn csrf_tokens(&self) -> Vec<Option<String>> {
        self.csrf_tokens.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn unscripted<T>(what: &str) -> Scripted<T> {
        (Duration::ZERO, Err(ApiError::Transport(format!("unscripted: {what}"))))
    }

    async fn answer<T>((delay, result): Scripted<T>) -> Result<T, ApiError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn search_suggest(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        self.record(format!("GET /api/search-suggest/?q={query}"));
        let scripted = self.suggestions.lock().unwrap().get(query).cloned();
        Self::answer(scripted.unwrap_or_else(|| Self::unscripted(query))).await
    }

    async fn product_detail(&self, product_id: &str) -> Result<ProductDetail, ApiError> {
        self.record(format!("GET /api/products/{product_id}/"));
        let scripted = self.products.lock().unwrap().get(product_id).cloned();
        Self::answer(scripted.unwrap_or_else(|| Self::unscripted(product_id))).await
    }

    async fn user_action(
        &self,
        request: &ActionRequest,
        csrf_token: Option<&str>,
    ) -> Result<ActionResponse, ApiError> {
        self.record(format!("POST {}", request.path()));
        self.csrf_tokens
            .lock()
            .unwrap()
            .push(csrf_token.map(str::to_string));
        let scripted = self.actions.lock().unwrap().pop_front();
        Self::answer(scripted.unwrap_or_else(|| Self::unscripted("action"))).await
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ApiError> {
        self.record(format!("GET {url}"));
        let scripted = self.pages.lock().unwrap().get(url).cloned();
        Self::answer(scripted.unwrap_or_else(|| Self::unscripted(url))).await
    }
}

/// Collects every event emitted under the given names.
pub fn record_events(bus: &EventBus, names: &[EventName]) -> Arc<Mutex<Vec<PageEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in names {
        let log = Arc::clone(&log);
        bus.subscribe(*name, move |event| log.lock().unwrap().push(event.clone()));
    }
    log
}
