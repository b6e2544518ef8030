//! # Shop Error Types
//!
//! Typed error handling for storage backends, catalog loading and
//! configuration. Cart operations themselves never fail; see `store`.

use thiserror::Error;

/// Core error type for fallible storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing catalog, bad data dir)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: u64 },

    /// Price was negative or not a finite number
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Catalog file or payload could not be parsed
    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    /// Local storage backend failed to read or write
    #[error("Storage error [{key}]: {message}")]
    Storage { key: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An operation needs a signed-in session
    #[error("Not signed in")]
    Unauthenticated,
}

impl ShopError {
    /// Build a storage error for `key`
    pub fn storage(key: impl Into<String>, message: impl ToString) -> Self {
        ShopError::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error came from the storage backend
    pub fn is_storage(&self) -> bool {
        matches!(self, ShopError::Storage { .. })
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
