//! Type-safe key-value storage for the PlanCart storefront.
//!
//! Provides a small, ergonomic API for keeping client-side state (the
//! shopping cart, mostly) in a durable key-value store with automatic JSON
//! serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use plancart_cache::{Cache, FileStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Line {
//!     id: String,
//! }
//!
//! let cache = Cache::new(FileStore::open(".plancart")?);
//!
//! // Store a value
//! cache.set("cart", &vec![Line { id: "P1".into() }])?;
//!
//! // Retrieve a value
//! let lines: Option<Vec<Line>> = cache.get("cart")?;
//!
//! // Delete a value
//! cache.delete("cart")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
