//! Cart, wishlist and comparison actions triggered from per-item controls.
//!
//! [`ActionDispatcher::perform_action`] owns the whole round trip for one
//! click: busy state on the control, the POST, the resulting toast, the icon
//! state and the count-changed event. Counts always come from the server
//! response; the dispatcher never increments anything itself, so concurrent
//! clicks (or other tabs) cannot make the badges drift.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::api::{ActionRequest, ActionResponse, ApiError, Backend, Entity};
use crate::config::{Messages, Settings};
use crate::dom::{ActionButton, Page};
use crate::events::{CountPayload, EventBus, PageEvent};

/// Icon class for "in the collection".
pub const ICON_FILLED: &str = "fas";
/// Icon class for "not in the collection".
pub const ICON_OUTLINE: &str = "far";
/// Icon accent while a product is in the wishlist.
pub const WISHLIST_ACCENT: &str = "text-sale-pink";
/// Icon accent while a product is in the comparison list.
pub const COMPARISON_ACCENT: &str = "text-lavender-dark";

/// What happened to one click. Errors are already surfaced as toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// No product id on the control, or the control was already busy.
    Skipped,
    /// Server accepted the action. `added` is the reported membership.
    Applied { added: bool },
    /// 2xx response with a failure status.
    Rejected,
    /// Transport failure, non-2xx status or unreadable body.
    Failed,
}

/// Clears the control's busy state however the request ends, including
/// when the future is dropped mid-flight.
struct BusyGuard<'a>(&'a ActionButton);

impl<'a> BusyGuard<'a> {
    /// `None` when another request already holds the control.
    fn engage(button: &'a ActionButton) -> Option<Self> {
        button.try_set_busy().then_some(Self(button))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set_busy(false);
    }
}

/// Runs wishlist, comparison and cart clicks against the backend and
/// reflects the result on the control and the bus.
pub struct ActionDispatcher {
    backend: Arc<dyn Backend>,
    page: Arc<dyn Page>,
    bus: EventBus,
    csrf_meta_name: String,
    messages: Messages,
}

impl ActionDispatcher {
    /// Build a dispatcher that emits on `bus`.
    pub fn new(backend: Arc<dyn Backend>, page: Arc<dyn Page>, bus: EventBus, settings: &Settings) -> Self {
        Self {
            backend,
            page,
            bus,
            csrf_meta_name: settings.csrf_meta_name.clone(),
            messages: settings.messages.clone(),
        }
    }

    /// Perform `action` on the product behind `button`.
    ///
    /// Never fails: every error ends up as a `show-toast` event.
    pub async fn perform_action(
        &self,
        button: &ActionButton,
        entity: Entity,
        action: &str,
        extra: Map<String, Value>,
    ) -> ActionOutcome {
        let Some(product_id) = button.product_id() else {
            tracing::debug!(%entity, action, "control has no product id");
            return ActionOutcome::Skipped;
        };
        let Some(_busy) = BusyGuard::engage(button) else {
            tracing::debug!(%entity, action, %product_id, "control busy, click ignored");
            return ActionOutcome::Skipped;
        };
        let request = ActionRequest {
            entity,
            action: action.to_string(),
            product_id,
            extra,
        };
        let csrf_token = self.page.meta(&self.csrf_meta_name);

        match self.backend.user_action(&request, csrf_token.as_deref()).await {
            Ok(response) if response.is_ok() => self.apply(button, entity, &response),
            Ok(response) => {
                let message = response
                    .error
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| self.messages.generic_error.clone());
                self.bus.emit(PageEvent::error(message));
                ActionOutcome::Rejected
            }
            Err(err) => {
                self.report_failure(&request, &err);
                ActionOutcome::Failed
            }
        }
    }

    fn report_failure(&self, request: &ActionRequest, err: &ApiError) {
        tracing::warn!(
            "Action error ({}/{}): {}",
            request.entity,
            request.action,
            err
        );
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.messages.network_error.clone());
        self.bus.emit(PageEvent::error(message));
    }

    fn apply(&self, button: &ActionButton, entity: Entity, response: &ActionResponse) -> ActionOutcome {
        if let Some(message) = response.message.as_deref().filter(|m| !m.is_empty()) {
            self.bus.emit(PageEvent::success(message));
        }

        let added = response.was_added();
        set_membership_icon(button, entity, added);

        match response.count_for(entity) {
            Some(count) => self.bus.emit(count_event(entity, count)),
            None => tracing::warn!(%entity, "action response carried no count"),
        }

        ActionOutcome::Applied { added }
    }
}

/// Reflect the server-reported membership on the control's icon.
///
/// Forced toggles, so the result depends only on `added`, never on the
/// icon's previous state.
pub fn set_membership_icon(button: &ActionButton, entity: Entity, added: bool) {
    match entity {
        Entity::Wishlist => {
            button.update_icon(|icon| {
                icon.toggle(ICON_OUTLINE, !added);
                icon.toggle(ICON_FILLED, added);
                icon.toggle(WISHLIST_ACCENT, added);
            });
        }
        Entity::Comparison => {
            button.update_icon(|icon| icon.toggle(COMPARISON_ACCENT, added));
        }
        Entity::Cart => {}
    }
}

fn count_event(entity: Entity, count: u64) -> PageEvent {
    let payload = CountPayload { count };
    match entity {
        Entity::Cart => PageEvent::UpdateCartCount(payload),
        Entity::Wishlist => PageEvent::UpdateWishlistCount(payload),
        Entity::Comparison => PageEvent::UpdateComparisonCount(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryPage;
    use crate::events::EventName;
    use crate::testing::{record_events, ScriptedBackend};
    use std::sync::Mutex;

    const ALL: &[EventName] = &[
        EventName::ShowToast,
        EventName::UpdateCartCount,
        EventName::UpdateWishlistCount,
        EventName::UpdateComparisonCount,
    ];

    struct Fixture {
        dispatcher: ActionDispatcher,
        backend: Arc<ScriptedBackend>,
        events: Arc<Mutex<Vec<PageEvent>>>,
    }

    fn fixture(backend: ScriptedBackend) -> Fixture {
        let backend = Arc::new(backend);
        let page = Arc::new(MemoryPage::new("/shop/").with_meta("csrf-token", "tok123"));
        let bus = EventBus::new();
        let events = record_events(&bus, ALL);
        let dispatcher = ActionDispatcher::new(backend.clone(), page, bus, &Settings::default());
        Fixture {
            dispatcher,
            backend,
            events,
        }
    }

    fn ok(extra: serde_json::Value) -> Result<ActionResponse, ApiError> {
        let mut body = serde_json::json!({"status": "ok"});
        body.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        Ok(serde_json::from_value(body).unwrap())
    }

    fn heart(classes: &str) -> ActionButton {
        ActionButton::new("42").with_icon(classes)
    }

    #[tokio::test]
    async fn test_missing_product_id_is_noop() {
        let fx = fixture(ScriptedBackend::new());
        let button = ActionButton::default();

        let outcome = fx
            .dispatcher
            .perform_action(&button, Entity::Cart, "add", Map::new())
            .await;

        assert_eq!(outcome, ActionOutcome::Skipped);
        assert!(fx.backend.calls().is_empty());
        assert!(fx.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wishlist_added_fills_icon_and_emits_count() {
        let fx = fixture(ScriptedBackend::new().action(
            0,
            ok(serde_json::json!({"action": "added", "message": "Added to wishlist", "wishlist_count": 4})),
        ));
        let button = heart("far fa-heart icon-default");

        let outcome = fx
            .dispatcher
            .perform_action(&button, Entity::Wishlist, "toggle", Map::new())
            .await;

        assert_eq!(outcome, ActionOutcome::Applied { added: true });
        let icon = button.icon().unwrap();
        assert!(icon.contains(ICON_FILLED));
        assert!(icon.contains(WISHLIST_ACCENT));
        assert!(!icon.contains(ICON_OUTLINE));
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![
                PageEvent::success("Added to wishlist"),
                PageEvent::UpdateWishlistCount(CountPayload { count: 4 }),
            ]
        );
        assert_eq!(fx.backend.calls(), vec!["POST /api/action/wishlist/toggle/"]);
        assert_eq!(fx.backend.csrf_tokens(), vec![Some("tok123".to_string())]);
        assert!(!button.is_busy());
    }

    #[tokio::test]
    async fn test_icon_state_depends_only_on_server_action() {
        let fx = fixture(
            ScriptedBackend::new()
                .action(0, ok(serde_json::json!({"action": "added", "wishlist_count": 1})))
                .action(0, ok(serde_json::json!({"action": "removed", "wishlist_count": 0})))
                .action(0, ok(serde_json::json!({"action": "removed", "wishlist_count": 0}))),
        );

        // Already filled, server says added: stays filled.
        let filled = heart("fas fa-heart icon-default text-sale-pink");
        fx.dispatcher
            .perform_action(&filled, Entity::Wishlist, "toggle", Map::new())
            .await;
        assert!(filled.icon().unwrap().contains(ICON_FILLED));
        assert!(!filled.icon().unwrap().contains(ICON_OUTLINE));

        // Filled, server says removed: outline.
        fx.dispatcher
            .perform_action(&filled, Entity::Wishlist, "toggle", Map::new())
            .await;
        let icon = filled.icon().unwrap();
        assert!(icon.contains(ICON_OUTLINE));
        assert!(!icon.contains(ICON_FILLED));
        assert!(!icon.contains(WISHLIST_ACCENT));

        // Already outline, server says removed: stays outline.
        let outline = heart("far fa-heart icon-default");
        fx.dispatcher
            .perform_action(&outline, Entity::Wishlist, "toggle", Map::new())
            .await;
        assert!(outline.icon().unwrap().contains(ICON_OUTLINE));
    }

    #[tokio::test]
    async fn test_comparison_toggles_accent_only() {
        let fx = fixture(ScriptedBackend::new().action(
            0,
            ok(serde_json::json!({"action": "added", "comparison_count": 2, "message": "Compared"})),
        ));
        let button = heart("fas fa-balance-scale icon-default");

        fx.dispatcher
            .perform_action(&button, Entity::Comparison, "toggle", Map::new())
            .await;

        let icon = button.icon().unwrap();
        assert!(icon.contains(COMPARISON_ACCENT));
        assert!(icon.contains("fas"));
        assert!(fx
            .events
            .lock()
            .unwrap()
            .contains(&PageEvent::UpdateComparisonCount(CountPayload { count: 2 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_counts_come_from_server_not_local_arithmetic() {
        let fx = fixture(
            ScriptedBackend::new()
                .action(10, ok(serde_json::json!({"cart_unique_items_count": 3, "message": "Added A"})))
                .action(20, ok(serde_json::json!({"cart_unique_items_count": 5, "message": "Added B"}))),
        );
        let a = ActionButton::new("1");
        let b = ActionButton::new("2");

        let mut extra = Map::new();
        extra.insert("quantity".to_string(), 1.into());
        tokio::join!(
            fx.dispatcher.perform_action(&a, Entity::Cart, "add", extra.clone()),
            fx.dispatcher.perform_action(&b, Entity::Cart, "add", extra),
        );

        let counts: Vec<u64> = fx
            .events
            .lock()
            .unwrap()
            .iter()
            .filter_map(PageEvent::count)
            .collect();
        assert_eq!(counts, vec![3, 5]);
        assert_eq!(fx.backend.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_control_ignores_repeat_clicks() {
        let fx = fixture(
            ScriptedBackend::new().action(50, ok(serde_json::json!({"cart_unique_items_count": 1}))),
        );
        let button = ActionButton::new("9");

        let (first, second) = tokio::join!(
            fx.dispatcher.perform_action(&button, Entity::Cart, "add", Map::new()),
            async {
                tokio::task::yield_now().await;
                assert!(button.is_busy());
                assert!(button.is_disabled());
                fx.dispatcher
                    .perform_action(&button, Entity::Cart, "add", Map::new())
                    .await
            }
        );

        assert_eq!(first, ActionOutcome::Applied { added: false });
        assert_eq!(second, ActionOutcome::Skipped);
        assert_eq!(fx.backend.calls().len(), 1);
        assert!(!button.is_busy());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_clicks_on_one_control_send_one_request() {
        let fx = fixture(
            ScriptedBackend::new().action(50, ok(serde_json::json!({"cart_unique_items_count": 1}))),
        );
        let dispatcher = Arc::new(fx.dispatcher);
        let button = ActionButton::new("9");

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let dispatcher = Arc::clone(&dispatcher);
                let button = button.clone();
                tokio::spawn(async move {
                    dispatcher
                        .perform_action(&button, Entity::Cart, "add", Map::new())
                        .await
                })
            })
            .collect();
        let mut applied = 0;
        for task in tasks {
            if matches!(task.await.unwrap(), ActionOutcome::Applied { .. }) {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(fx.backend.calls().len(), 1);
        assert!(!button.is_busy());
    }

    #[tokio::test]
    async fn test_status_error_uses_server_message() {
        let fx = fixture(ScriptedBackend::new().action(
            0,
            Err(ApiError::Status {
                status: 400,
                message: Some("Insufficient stock".to_string()),
            }),
        ));
        let button = ActionButton::new("5");

        let outcome = fx
            .dispatcher
            .perform_action(&button, Entity::Cart, "add", Map::new())
            .await;

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![PageEvent::error("Insufficient stock")]
        );
        assert!(!button.is_busy());
    }

    #[tokio::test]
    async fn test_transport_and_bare_status_errors_use_network_message() {
        let fx = fixture(
            ScriptedBackend::new()
                .action(0, Err(ApiError::Transport("connection reset".to_string())))
                .action(0, Err(ApiError::Status { status: 502, message: None })),
        );
        let a = ActionButton::new("5");
        let b = ActionButton::new("6");

        fx.dispatcher.perform_action(&a, Entity::Cart, "add", Map::new()).await;
        fx.dispatcher.perform_action(&b, Entity::Cart, "remove", Map::new()).await;

        let network = Settings::default().messages.network_error;
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![PageEvent::error(network.clone()), PageEvent::error(network)]
        );
        assert!(!a.is_busy() && !b.is_busy());
    }

    #[tokio::test]
    async fn test_application_failure_flag() {
        let fx = fixture(
            ScriptedBackend::new()
                .action(0, Ok(ActionResponse {
                    status: "error".to_string(),
                    error: Some("Product unavailable".to_string()),
                    ..ActionResponse::default()
                }))
                .action(0, Ok(ActionResponse {
                    status: "error".to_string(),
                    ..ActionResponse::default()
                })),
        );
        let button = heart("far icon-default");

        let first = fx
            .dispatcher
            .perform_action(&button, Entity::Wishlist, "toggle", Map::new())
            .await;
        let second = fx
            .dispatcher
            .perform_action(&button, Entity::Wishlist, "toggle", Map::new())
            .await;

        assert_eq!(first, ActionOutcome::Rejected);
        assert_eq!(second, ActionOutcome::Rejected);
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![
                PageEvent::error("Product unavailable"),
                PageEvent::error(Settings::default().messages.generic_error),
            ]
        );
        assert!(button.icon().unwrap().contains(ICON_OUTLINE));
    }

    #[tokio::test]
    async fn test_missing_count_emits_no_count_event() {
        let fx = fixture(ScriptedBackend::new().action(0, ok(serde_json::json!({"message": "Removed"}))));
        let button = ActionButton::new("3");

        fx.dispatcher
            .perform_action(&button, Entity::Cart, "remove", Map::new())
            .await;

        assert_eq!(*fx.events.lock().unwrap(), vec![PageEvent::success("Removed")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_request_clears_busy() {
        let fx = fixture(ScriptedBackend::new().action(1000, ok(serde_json::json!({}))));
        let button = ActionButton::new("3");

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            fx.dispatcher.perform_action(&button, Entity::Cart, "add", Map::new()),
        )
        .await;

        assert!(result.is_err());
        assert!(!button.is_busy());
    }
}
