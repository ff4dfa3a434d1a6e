//! Authoritative catalog records and the service that serves them.

use crate::addon::{Addon, AddonKind};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Current price and metadata of one product, as served by the catalog.
///
/// Prices arrive loosely typed: the base price and each entry of the add-on
/// map may be missing, `null`, a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    /// Price of the plan alone, as a decimal amount.
    #[serde(default)]
    pub base_price: Value,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub addon_prices: BTreeMap<String, Value>,
    #[serde(default)]
    pub recommended_upsell_id: Option<ProductId>,
}

impl ProductRecord {
    pub fn new(id: impl Into<ProductId>, base_price: Money) -> Self {
        Self {
            id: id.into(),
            base_price: Value::from(base_price.to_decimal()),
            code: None,
            addon_prices: BTreeMap::new(),
            recommended_upsell_id: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_addon(mut self, key: impl Into<String>, price: Money) -> Self {
        self.addon_prices
            .insert(key.into(), Value::from(price.to_decimal()));
        self
    }

    pub fn with_upsell(mut self, upsell: impl Into<ProductId>) -> Self {
        self.recommended_upsell_id = Some(upsell.into());
        self
    }

    /// The plan price, or `None` if the record carries no usable one.
    pub fn base_price(&self) -> Option<Money> {
        parse_price(&self.base_price).filter(|price| !price.is_negative())
    }

    /// Add-ons this record offers: known kinds with a positive price,
    /// ordered by kind.
    pub fn offered_addons(&self) -> Vec<Addon> {
        let mut offered: Vec<Addon> = self
            .addon_prices
            .iter()
            .filter_map(|(key, value)| {
                let kind = AddonKind::parse(key);
                let price = parse_price(value)?;
                Some(Addon::new(kind, price))
            })
            .filter(Addon::is_priceable)
            .collect();
        offered.sort_by(|a, b| a.id.cmp(&b.id));
        offered.dedup_by(|a, b| a.id == b.id);
        offered
    }
}

/// Read a loosely typed price. Anything unreadable or out of range is
/// `None`.
fn parse_price(value: &Value) -> Option<Money> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let price = Money::try_from_decimal(amount);
    if price.is_none() {
        tracing::warn!(%value, "ignoring out-of-range catalog price");
    }
    price
}

/// Source of authoritative product records.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch records for `ids`. Missing products are simply absent from the
    /// result.
    async fn fetch_products_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<ProductRecord>, CommerceError>;
}
