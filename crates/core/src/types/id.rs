//! Newtype IDs for type-safe entity references.
//!
//! Catalog products are identified by opaque strings handed out by the
//! catalog API, while gallery entries carry a numeric, timestamp-derived ID.
//! Wrapping both prevents accidentally looking up a gallery entry with a
//! product ID or vice versa.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog product (e.g. `hoodie_basic`).
///
/// # Example
///
/// ```rust
/// # use fitting_room_core::ProductId;
/// let id = ProductId::new("hoodie_basic");
/// assert_eq!(id.as_str(), "hoodie_basic");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a saved gallery entry.
///
/// Values are milliseconds since the Unix epoch at save time, bumped forward
/// when two saves land in the same millisecond, so ordering by ID matches
/// ordering by save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedFitId(i64);

impl SavedFitId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SavedFitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SavedFitId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SavedFitId> for i64 {
    fn from(id: SavedFitId) -> Self {
        id.0
    }
}

impl std::str::FromStr for SavedFitId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}
