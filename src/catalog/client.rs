//! HTTP client for the Hostinger Ecommerce admin API.
//!
//! Authentication rides on the session cookie (`jwt=<token>`) and every call
//! is scoped to a store through `x-ecommerce-id`. Single-product reads and
//! writes also carry a fresh `x-correlation-id`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE,
};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

use super::{CatalogApi, UpdatePayload};
use crate::credentials::{CredentialBundle, MISSING_CREDENTIALS};
use crate::types::{CatalogConfig, CorrelationId, Error, ProductId, Result};
use crate::validation::validate_non_empty;

/// Store-scope header.
pub const STORE_HEADER: &str = "x-ecommerce-id";
/// Per-request tracing header.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";

/// Catalog API client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Arc<CredentialBundle>>,
}

impl CatalogClient {
    /// Build a client. `credentials` is `None` when startup resolution failed;
    /// every call then fails with a configuration error before touching the
    /// network.
    pub fn new(config: &CatalogConfig, credentials: Option<Arc<CredentialBundle>>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::configuration(format!("Invalid catalog base URL '{}': {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::configuration(format!(
                "Catalog base URL cannot be a base: {}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| {
                Error::configuration(format!("Invalid accept-language value: {}", e))
            })?,
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Whether credentials were resolved at startup.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&CredentialBundle> {
        self.credentials
            .as_deref()
            .ok_or_else(|| Error::configuration(MISSING_CREDENTIALS))
    }

    /// `{base}/products[/{id}]`, with the id percent-encoded as one segment.
    fn products_url(&self, product_id: Option<&ProductId>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::internal("catalog base URL cannot be a base"))?;
            segments.pop_if_empty().push("products");
            if let Some(id) = product_id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    fn authorize(request: RequestBuilder, credentials: &CredentialBundle) -> RequestBuilder {
        request
            .header(COOKIE, format!("jwt={}", credentials.token()))
            .header(STORE_HEADER, credentials.store_id())
    }

    async fn send(request: RequestBuilder, correlation_id: Option<&CorrelationId>) -> Result<Value> {
        let response = request.send().await?;
        tracing::debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            correlation_id = correlation_id.map(CorrelationId::as_str),
            "catalog response"
        );
        read_json(response).await
    }
}

/// Turn a catalog response into its JSON body, or a typed error.
async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::remote(status.as_u16(), status_text(status)));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| Error::malformed(format!("response body is not valid JSON: {}", e)))
}

/// Reason phrase for `status`; codes without one (520, 499, ...) fall back to
/// their display form so the payload never carries an empty `statusText`.
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.to_string(),
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    fn check_credentials(&self) -> Result<()> {
        self.credentials().map(|_| ())
    }

    async fn get_product(&self, product_id: &ProductId) -> Result<Value> {
        let credentials = self.credentials()?;
        validate_non_empty(product_id.as_str(), "productId")?;

        let url = self.products_url(Some(product_id))?;
        let correlation_id = CorrelationId::new();
        let request = Self::authorize(self.http.get(url), credentials)
            .header(CORRELATION_HEADER, correlation_id.as_str());

        Self::send(request, Some(&correlation_id)).await
    }

    async fn list_products(&self, limit: u64, offset: u64) -> Result<Value> {
        let credentials = self.credentials()?;

        let mut url = self.products_url(None)?;
        url.query_pairs_mut()
            .append_pair("order", "DESC")
            .append_pair("sort_by", "created_at")
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());

        let request = Self::authorize(self.http.get(url), credentials);
        Self::send(request, None).await
    }

    async fn update_product(
        &self,
        product_id: &ProductId,
        payload: &UpdatePayload,
    ) -> Result<Value> {
        let credentials = self.credentials()?;
        validate_non_empty(product_id.as_str(), "productId")?;

        let url = self.products_url(Some(product_id))?;
        let correlation_id = CorrelationId::new();
        let body = serde_json::to_vec(payload)?;
        let request = Self::authorize(self.http.post(url), credentials)
            .header(CORRELATION_HEADER, correlation_id.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        Self::send(request, Some(&correlation_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, credentials: Option<Arc<CredentialBundle>>) -> CatalogClient {
        let config = CatalogConfig {
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        };
        CatalogClient::new(&config, credentials).unwrap()
    }

    fn product_id(s: &str) -> ProductId {
        ProductId::from_string(s.to_string()).unwrap()
    }

    #[test]
    fn test_products_url_default_base() {
        let client = client("https://api-ecommerce.hostinger.com/admin", None);
        assert_eq!(
            client.products_url(None).unwrap().as_str(),
            "https://api-ecommerce.hostinger.com/admin/products"
        );
        assert_eq!(
            client.products_url(Some(&product_id("prod_1"))).unwrap().as_str(),
            "https://api-ecommerce.hostinger.com/admin/products/prod_1"
        );
    }

    #[test]
    fn test_products_url_trailing_slash_and_encoding() {
        let client = client("http://127.0.0.1:8080/admin/", None);
        assert_eq!(
            client.products_url(Some(&product_id("a b/c"))).unwrap().as_str(),
            "http://127.0.0.1:8080/admin/products/a%20b%2Fc"
        );
    }

    #[test]
    fn test_invalid_base_url_is_configuration_error() {
        let config = CatalogConfig {
            base_url: "not a url".to_string(),
            ..CatalogConfig::default()
        };
        let err = CatalogClient::new(&config, None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_network() {
        // Port 9 (discard) is never contacted: credentials are checked first.
        let client = client("http://127.0.0.1:9", None);
        assert!(!client.has_credentials());
        assert!(matches!(client.check_credentials(), Err(Error::Configuration(_))));

        let err = client.get_product(&product_id("p1")).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = client.list_products(25, 0).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_status_text_never_empty() {
        assert_eq!(status_text(StatusCode::NOT_FOUND), "Not Found");
        let odd = StatusCode::from_u16(520).unwrap();
        assert_eq!(odd.canonical_reason(), None);
        assert_eq!(status_text(odd), "520 <unknown status code>");
    }
}
