//! Wire types for the storefront API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// User collection an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Cart,
    Wishlist,
    Comparison,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Wishlist => "wishlist",
            Self::Comparison => "comparison",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cart" => Ok(Self::Cart),
            "wishlist" => Ok(Self::Wishlist),
            "comparison" => Ok(Self::Comparison),
            other => Err(format!("unknown entity: {other}")),
        }
    }
}

/// One click on an action control. Built per click, never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub entity: Entity,
    /// Backend verb (`add`, `remove`, `toggle`, ...).
    pub action: String,
    pub product_id: String,
    /// Extra body fields such as `quantity`.
    pub extra: Map<String, Value>,
}

impl ActionRequest {
    pub fn new(entity: Entity, action: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            entity,
            action: action.into(),
            product_id: product_id.into(),
            extra: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// `/api/action/<entity>/<action>/`
    pub fn path(&self) -> String {
        format!("/api/action/{}/{}/", self.entity, self.action)
    }

    /// JSON body: `product_id` plus the extra fields. `product_id` wins
    /// over an extra field of the same name.
    pub fn body(&self) -> Value {
        let mut body = self.extra.clone();
        body.insert("product_id".to_string(), Value::String(self.product_id.clone()));
        Value::Object(body)
    }
}

/// Body of a 2xx action response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub status: String,
    pub message: Option<String>,
    pub error: Option<String>,
    /// `"added"` or `"removed"` for toggles.
    pub action: Option<String>,
    pub wishlist_count: Option<u64>,
    pub cart_unique_items_count: Option<u64>,
    pub comparison_count: Option<u64>,
    pub cart_total_price: Option<Value>,
}

impl ActionResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    pub fn was_added(&self) -> bool {
        self.action.as_deref() == Some("added")
    }

    /// Authoritative count for `entity` reported by the server.
    pub fn count_for(&self, entity: Entity) -> Option<u64> {
        match entity {
            Entity::Cart => self.cart_unique_items_count,
            Entity::Wishlist => self.wishlist_count,
            Entity::Comparison => self.comparison_count,
        }
    }
}

/// Body of a failed (non-2xx) response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// One search suggestion. Older endpoints send bare strings; newer ones
/// send objects with a link, thumbnail and prices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSuggestion")]
pub struct Suggestion {
    pub name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub old_price: Option<String>,
}

impl Suggestion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSuggestion {
    Name(String),
    Full {
        name: String,
        url: Option<String>,
        image_url: Option<String>,
        price: Option<String>,
        old_price: Option<String>,
    },
}

impl From<RawSuggestion> for Suggestion {
    fn from(raw: RawSuggestion) -> Self {
        match raw {
            RawSuggestion::Name(name) => Suggestion::new(name),
            RawSuggestion::Full {
                name,
                url,
                image_url,
                price,
                old_price,
            } => Suggestion {
                name,
                url,
                image_url,
                price,
                old_price,
            },
        }
    }
}

/// Decimal price as the server formats it (`"12990.00"` or `12990`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPrice")]
pub struct Price(pub String);

impl Price {
    pub fn value(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawPrice> for Price {
    fn from(raw: RawPrice) -> Self {
        match raw {
            RawPrice::Text(s) => Price(s),
            RawPrice::Number(n) => Price(n.to_string()),
        }
    }
}

/// Quick-view payload from `/api/products/<id>/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProductDetail")]
pub struct ProductDetail {
    pub id: Value,
    pub name: String,
    pub price: Option<Price>,
    /// Ordered image URLs, main image first.
    pub images: Vec<String>,
    /// Every other field the endpoint returns.
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawProductDetail {
    id: Value,
    name: String,
    #[serde(alias = "final_price")]
    price: Option<Price>,
    #[serde(default)]
    images: Vec<String>,
    image: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawProductDetail> for ProductDetail {
    fn from(raw: RawProductDetail) -> Self {
        let mut images = raw.images;
        if let Some(image) = raw.image.filter(|i| !i.is_empty()) {
            if !images.contains(&image) {
                images.insert(0, image);
            }
        }
        ProductDetail {
            id: raw.id,
            name: raw.name,
            price: raw.price,
            images,
            extra: raw.extra,
        }
    }
}
