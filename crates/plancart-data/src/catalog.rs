//! Catalog service over HTTP.

use crate::{FetchClient, FetchError};
use async_trait::async_trait;
use plancart_commerce::catalog::{CatalogService, ProductRecord};
use plancart_commerce::{CommerceError, ProductId};
use serde::Deserialize;
use serde_json::Value;

/// Path products are served from when none is configured.
pub const DEFAULT_PRODUCTS_PATH: &str = "/api/products";

/// Fetches product records with `GET <path>?ids=a,b,c`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: FetchClient,
    products_path: String,
}

impl HttpCatalog {
    pub fn new(client: FetchClient, products_path: impl Into<String>) -> Self {
        Self {
            client,
            products_path: products_path.into(),
        }
    }

    pub fn products_path(&self) -> &str {
        &self.products_path
    }

    /// Value of the `ids` query parameter.
    pub fn ids_param(ids: &[ProductId]) -> String {
        ids.iter()
            .map(ProductId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn fetch_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<ProductRecord>, CommerceError> {
        let query = [("ids", Self::ids_param(ids))];
        let body = self.client.get_bytes(&self.products_path, &query).await?;
        Ok(decode_records(&body)?)
    }
}

/// Catalogs answer either with a bare array or with `{"products": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsBody {
    Bare(Vec<Value>),
    Wrapped { products: Vec<Value> },
}

/// Decode a catalog response body.
///
/// Records that do not decode are dropped with a warning; the rest of the
/// batch is kept.
pub fn decode_records(body: &[u8]) -> Result<Vec<ProductRecord>, FetchError> {
    let raw = match serde_json::from_slice::<RecordsBody>(body)? {
        RecordsBody::Bare(records) => records,
        RecordsBody::Wrapped { products } => products,
    };

    let records = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<ProductRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed catalog record");
                None
            }
        })
        .collect();
    Ok(records)
}
