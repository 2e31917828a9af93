//! Catalog product.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as served by the catalog API.
///
/// Products are immutable once fetched. The same JSON shape is used when the
/// cart is written to local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in the store currency.
    pub price: Price,
    /// Absolute URL of the product image.
    pub image: String,
    /// Catalog category (e.g. `Top`, `Outer`).
    pub category: String,
}
