//! CLI configuration.

use anyhow::{Context, Result};
use plancart_commerce::bundle::BundleRule;
use plancart_commerce::persistence::CART_STORAGE_KEY;
use plancart_commerce::Currency;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalog the cart reconciles against.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Display currency and bundle discount.
    #[serde(default)]
    pub pricing: PricingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Display currency.
    pub fn currency(&self) -> Result<Currency> {
        Currency::from_code(&self.pricing.currency)
            .with_context(|| format!("Unsupported currency: {}", self.pricing.currency))
    }

    /// Complete-bundle discount rule.
    pub fn bundle_rule(&self) -> BundleRule {
        BundleRule {
            min_optional_addons: self.pricing.bundle_min_optional_addons,
            discount_percent: self.pricing.bundle_discount_percent,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store (default: .plancart).
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Key the cart is saved under (default: cart).
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            key: default_storage_key(),
        }
    }
}

fn default_storage_dir() -> String {
    ".plancart".to_string()
}

fn default_storage_key() -> String {
    CART_STORAGE_KEY.to_string()
}

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path serving product records.
    #[serde(default = "default_products_path")]
    pub products_path: String,

    /// Bearer token for the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            products_path: default_products_path(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_products_path() -> String {
    plancart_data::DEFAULT_PRODUCTS_PATH.to_string()
}

/// Pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Display currency code (default: BRL).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Percentage off a complete bundle (default: 15).
    #[serde(default = "default_bundle_discount_percent")]
    pub bundle_discount_percent: u32,

    /// Optional add-ons a product must offer for the bundle to apply (default: 3).
    #[serde(default = "default_bundle_min_optional_addons")]
    pub bundle_min_optional_addons: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            bundle_discount_percent: default_bundle_discount_percent(),
            bundle_min_optional_addons: default_bundle_min_optional_addons(),
        }
    }
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_bundle_discount_percent() -> u32 {
    BundleRule::default().discount_percent
}

fn default_bundle_min_optional_addons() -> usize {
    BundleRule::default().min_optional_addons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.storage.dir, ".plancart");
        assert_eq!(config.storage.key, "cart");
        assert_eq!(config.catalog.products_path, "/api/products");
        assert_eq!(config.currency().unwrap(), Currency::BRL);
        assert_eq!(config.bundle_rule(), BundleRule::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [catalog]
            base_url = "https://plans.example.com"

            [pricing]
            currency = "usd"
            bundle_discount_percent = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.base_url, "https://plans.example.com");
        assert_eq!(config.catalog.products_path, "/api/products");
        assert_eq!(config.currency().unwrap(), Currency::USD);
        assert_eq!(config.bundle_rule().discount_percent, 10);
        assert_eq!(config.bundle_rule().min_optional_addons, 3);
        assert_eq!(config.storage.dir, ".plancart");
    }

    #[test]
    fn test_unknown_currency() {
        let mut config = CliConfig::default();
        config.pricing.currency = "XYZ".to_string();
        assert!(config.currency().is_err());
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plancart.json");
        std::fs::write(&path, r#"{"storage": {"key": "cart:guest"}}"#).unwrap();

        let loaded = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.storage.key, "cart:guest");
        assert_eq!(loaded.storage.dir, ".plancart");
    }
}
