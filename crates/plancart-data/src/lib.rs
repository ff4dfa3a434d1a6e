//! HTTP catalog client for PlanCart.
//!
//! Provides a small HTTP client with base URL and default header handling,
//! and [`HttpCatalog`], the catalog service the cart reconciles against.
//!
//! # Example
//!
//! ```rust,ignore
//! use plancart_data::{FetchClient, HttpCatalog};
//!
//! let client = FetchClient::new()
//!     .with_base_url("https://plans.example.com")
//!     .with_default_header("Authorization", "Bearer secret");
//! let catalog = HttpCatalog::new(client, "/api/products");
//!
//! store.reconcile(&catalog).await;
//! ```

mod catalog;
mod error;

pub use catalog::{decode_records, HttpCatalog, DEFAULT_PRODUCTS_PATH};
pub use error::FetchError;

use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP client for outbound JSON requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Add a bearer token sent with every request.
    pub fn with_bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_default_header("Authorization", value)
    }

    /// Resolve `url` against the base URL.
    pub fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    url.to_string()
                } else {
                    format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        url.trim_start_matches('/')
                    )
                }
            }
            None => url.to_string(),
        }
    }

    /// GET `url` with query parameters and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let bytes = self.get_bytes(url, query).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// GET `url` and return the raw body of a successful response.
    pub async fn get_bytes(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, FetchError> {
        let full_url = self.resolve(url);
        let mut request = self.http.get(&full_url).query(query);
        for (key, value) in &self.default_headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(url = %full_url, status = status.as_u16(), "fetched");
        Ok(response.bytes().await?.to_vec())
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpCatalog};
}
