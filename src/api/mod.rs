//! Storefront backend client.
//!
//! Widgets talk to the server only through the [`Backend`] trait so the
//! transport can be swapped (reqwest in production, scripted doubles in
//! tests).
//!
//! ## Endpoints
//!
//! - `GET  /api/search-suggest/?q=<query>` → suggestions
//! - `GET  /api/products/<id>/` → [`ProductDetail`]
//! - `POST /api/action/<entity>/<action>/` → [`ActionResponse`]
//! - `GET  <catalog url>` → full HTML document

mod client;
mod types;

pub use client::{HttpBackend, REQUESTED_WITH};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),
    /// Non-2xx status, with the server's `error` text when it sent one.
    #[error("Server returned status {status}")]
    Status { status: u16, message: Option<String> },
    /// 2xx response whose body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Malformed(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message the server attached to a failed response.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The HTTP surface the widgets depend on.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Suggestions for `query`, in server order.
    async fn search_suggest(&self, query: &str) -> Result<Vec<Suggestion>, ApiError>;

    async fn product_detail(&self, product_id: &str) -> Result<ProductDetail, ApiError>;

    /// Perform a cart/wishlist/comparison action. `csrf_token` comes from
    /// the page's metadata.
    async fn user_action(
        &self,
        request: &ActionRequest,
        csrf_token: Option<&str>,
    ) -> Result<ActionResponse, ApiError>;

    /// Fetch `url` as an HTML document.
    async fn fetch_page(&self, url: &str) -> Result<String, ApiError>;
}
