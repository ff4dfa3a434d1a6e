//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Cart mutations never surface these; they show up from the catalog and
/// checkout collaborators and from checkout itself.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Checkout was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Contact details were rejected before contacting any service.
    #[error("Invalid contact email: {0}")]
    InvalidEmail(String),

    /// The catalog could not be queried.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The payment provider refused to open a checkout session.
    #[error("Payment session failed: {0}")]
    PaymentFailed(String),

    /// Lead capture failed.
    #[error("Lead capture failed: {0}")]
    LeadCaptureFailed(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<plancart_cache::CacheError> for CommerceError {
    fn from(e: plancart_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
