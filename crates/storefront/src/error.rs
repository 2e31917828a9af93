//! Unified error handling.
//!
//! Provides a unified `ClientError` type for session-level operations. The
//! module-level errors (`ConfigError`, `StorageError`, `ApiError`,
//! `TryOnError`) convert into it with `?`.

use fitting_room_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::fitting::TryOnError;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Try-on did not produce a result.
    #[error("Try-on error: {0}")]
    TryOn(#[from] TryOnError),

    /// Product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotInCart(ProductId),

    /// No successful try-on result exists for the product.
    #[error("No try-on result for product: {0}")]
    NoResult(ProductId),
}

impl ClientError {
    /// Whether the shopper was already told about this error through a
    /// notice, so the presentation layer should not report it again.
    #[must_use]
    pub const fn already_notified(&self) -> bool {
        matches!(
            self,
            Self::TryOn(TryOnError::PhotoRequired | TryOnError::Api(_))
        )
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;
