//! Durable cart snapshots.

use crate::cart::{CartLine, CartState};
use crate::money::Currency;
use plancart_cache::{Cache, MemoryStore};

/// Storage key the cart lives under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Saves and loads the cart's line array under a single key.
///
/// Neither operation fails from the caller's point of view: problems are
/// logged and the in-memory cart stays authoritative.
#[derive(Debug, Clone)]
pub struct CartStorage {
    cache: Cache,
    key: String,
}

impl CartStorage {
    /// Persist under [`CART_STORAGE_KEY`].
    pub fn new(cache: Cache) -> Self {
        Self::with_key(cache, CART_STORAGE_KEY)
    }

    pub fn with_key(cache: Cache, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// Session-only storage; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(Cache::new(MemoryStore::new()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write a snapshot of `state`.
    pub fn save(&self, state: &CartState) {
        match self.cache.set(&self.key, state) {
            Ok(()) => tracing::trace!(key = %self.key, lines = state.len(), "cart saved"),
            Err(e) => tracing::warn!(key = %self.key, error = %e, "failed to save cart"),
        }
    }

    /// Read the last snapshot, or an empty cart if there is none or it is
    /// unreadable.
    pub fn load(&self, currency: Currency) -> CartState {
        match self.cache.get::<Vec<CartLine>>(&self.key) {
            Ok(Some(lines)) => {
                tracing::debug!(key = %self.key, lines = lines.len(), "cart restored");
                CartState::from_lines(lines, currency)
            }
            Ok(None) => CartState::new(currency),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable cart snapshot");
                CartState::new(currency)
            }
        }
    }

    /// Remove the snapshot.
    pub fn clear(&self) {
        if let Err(e) = self.cache.delete(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "failed to delete cart snapshot");
        }
    }
}
