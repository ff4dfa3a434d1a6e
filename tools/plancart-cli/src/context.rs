//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use plancart_cache::{Cache, FileStore};
use plancart_commerce::bundle::BundleRule;
use plancart_commerce::cart::CartStore;
use plancart_commerce::persistence::CartStorage;
use plancart_commerce::Currency;
use plancart_data::{FetchClient, HttpCatalog};

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Display currency, resolved from the config.
    pub currency: Currency,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };
        let currency = config.currency()?;

        Ok(Self {
            config,
            output,
            cwd,
            currency,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["plancart.toml", ".plancart.toml", "plancart.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some(config),
                        Err(e) => tracing::warn!(path = %config_path.display(), error = %e, "skipping config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Directory the cart is stored in.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the persisted cart.
    pub fn open_store(&self) -> Result<CartStore> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage at {}", dir.display()))?;
        let storage = CartStorage::with_key(Cache::new(store), self.config.storage.key.clone());
        tracing::debug!(dir = %dir.display(), key = storage.key(), "opening cart");
        Ok(CartStore::open(storage, self.currency))
    }

    /// Catalog client built from the `[catalog]` section.
    pub fn catalog(&self) -> HttpCatalog {
        let catalog = &self.config.catalog;
        let mut client = FetchClient::new().with_base_url(catalog.base_url.clone());
        if let Some(key) = &catalog.api_key {
            client = client.with_bearer_auth(key);
        }
        HttpCatalog::new(client, catalog.products_path.clone())
    }

    /// Complete-bundle discount rule.
    pub fn bundle_rule(&self) -> BundleRule {
        self.config.bundle_rule()
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
impl Context {
    /// Context rooted at `dir` with default config and quiet output.
    pub(crate) fn in_dir(dir: &Path) -> Self {
        let mut config = CliConfig::default();
        config.storage.dir = dir.join("store").to_string_lossy().into_owned();
        Self {
            currency: Currency::BRL,
            config,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
        }
    }
}
