//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use super::{ActionRequest, ActionResponse, ApiError, Backend, ErrorBody, ProductDetail, Suggestion};
use crate::config::Settings;

/// Value of the `X-Requested-With` header marking programmatic requests.
pub const REQUESTED_WITH: &str = "XMLHttpRequest";

/// Backend talking to a live storefront over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", settings.base_url, e)))?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(concat!("storefront-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path or absolute URL against the base.
    fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        self.base
            .join(url)
            .map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))
    }

    fn product_url(&self, product_id: &str) -> Result<Url, ApiError> {
        let mut url = self.resolve("/api/products/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(product_id)
            .push("");
        Ok(url)
    }

    /// Turn a non-2xx response into [`ApiError::Status`].
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn search_suggest(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        let url = self.resolve("/api/search-suggest/")?;
        tracing::debug!(query, "GET {}", url);

        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn product_detail(&self, product_id: &str) -> Result<ProductDetail, ApiError> {
        let url = self.product_url(product_id)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn user_action(
        &self,
        request: &ActionRequest,
        csrf_token: Option<&str>,
    ) -> Result<ActionResponse, ApiError> {
        let url = self.resolve(&request.path())?;
        tracing::debug!(product_id = %request.product_id, "POST {}", url);

        let mut builder = self
            .client
            .post(url)
            .header("X-Requested-With", REQUESTED_WITH)
            .json(&request.body());
        if let Some(token) = csrf_token {
            builder = builder.header("X-CSRFToken", token);
        } else {
            tracing::warn!("No CSRF token on page, sending {} without one", request.path());
        }

        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ApiError> {
        let url = self.resolve(url)?;
        tracing::debug!("GET {} (fragment)", url);

        let response = self
            .client
            .get(url)
            .header("X-Requested-With", REQUESTED_WITH)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }
}
