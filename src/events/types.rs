//! Event names and payloads shared by every widget.

use serde::{Deserialize, Serialize};

/// Names under which handlers subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    ShowToast,
    UpdateWishlistCount,
    UpdateCartCount,
    UpdateComparisonCount,
    FilterNavigate,
}

impl EventName {
    /// The DOM event name used on the page.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowToast => "show-toast",
            Self::UpdateWishlistCount => "update-wishlist-count",
            Self::UpdateCartCount => "update-cart-count",
            Self::UpdateComparisonCount => "update-comparison-count",
            Self::FilterNavigate => "filter-navigate",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toast severity, serialized as the `type` field of `show-toast`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

/// `show-toast` detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastPayload {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: ToastKind,
}

/// Detail of the three count-changed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountPayload {
    pub count: u64,
}

/// `filter-navigate` detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatePayload {
    pub url: String,
}

/// Any event carried by the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "kebab-case")]
pub enum PageEvent {
    ShowToast(ToastPayload),
    UpdateWishlistCount(CountPayload),
    UpdateCartCount(CountPayload),
    UpdateComparisonCount(CountPayload),
    FilterNavigate(NavigatePayload),
}

impl PageEvent {
    pub fn name(&self) -> EventName {
        match self {
            Self::ShowToast(_) => EventName::ShowToast,
            Self::UpdateWishlistCount(_) => EventName::UpdateWishlistCount,
            Self::UpdateCartCount(_) => EventName::UpdateCartCount,
            Self::UpdateComparisonCount(_) => EventName::UpdateComparisonCount,
            Self::FilterNavigate(_) => EventName::FilterNavigate,
        }
    }

    /// Create a `show-toast` event.
    pub fn toast(message: impl Into<String>, kind: ToastKind) -> Self {
        Self::ShowToast(ToastPayload {
            message: message.into(),
            kind,
        })
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::toast(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::toast(message, ToastKind::Error)
    }

    /// Create a `filter-navigate` event.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::FilterNavigate(NavigatePayload { url: url.into() })
    }

    /// Count carried by a count-changed event, if this is one.
    pub fn count(&self) -> Option<u64> {
        match self {
            Self::UpdateWishlistCount(p) | Self::UpdateCartCount(p) | Self::UpdateComparisonCount(p) => {
                Some(p.count)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_match_dom_names() {
        assert_eq!(PageEvent::error("x").name().as_str(), "show-toast");
        assert_eq!(
            PageEvent::UpdateCartCount(CountPayload { count: 1 }).name().to_string(),
            "update-cart-count"
        );
        assert_eq!(PageEvent::navigate("/shop/").name().as_str(), "filter-navigate");
    }

    #[test]
    fn test_toast_payload_wire_shape() {
        let json = serde_json::to_value(PageEvent::success("Added")).unwrap();
        assert_eq!(json["event"], "show-toast");
        assert_eq!(json["detail"]["message"], "Added");
        assert_eq!(json["detail"]["type"], "success");
    }

    #[test]
    fn test_toast_kind_defaults_to_info() {
        let payload: ToastPayload = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(payload.kind, ToastKind::Info);
    }

    #[test]
    fn test_count_accessor() {
        let event = PageEvent::UpdateWishlistCount(CountPayload { count: 7 });
        assert_eq!(event.count(), Some(7));
        assert_eq!(PageEvent::navigate("/").count(), None);
    }
}
