//! Gallery entry for a saved try-on result.

use serde::{Deserialize, Serialize};

use super::{ProductId, SavedFitId};

/// A try-on result the shopper chose to keep.
///
/// The product name is a snapshot taken at save time; it is not re-joined
/// against the catalog when the gallery is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFit {
    /// Unique, strictly increasing entry ID.
    pub id: SavedFitId,
    /// Product the result was generated for.
    pub product_id: ProductId,
    /// Product display name at save time.
    pub product_name: String,
    /// URL of the generated image.
    pub image_url: String,
    /// Save date for display (`YYYY-MM-DD`, local time).
    pub date: String,
}
