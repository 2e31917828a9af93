//! Try-on request status.

use serde::{Deserialize, Serialize};

/// Lifecycle of a try-on request for one product.
///
/// ```text
/// Idle -> Pending -> Succeeded
///                 \-> Failed
/// ```
///
/// `Succeeded` and `Failed` only move back to `Pending` when a brand-new
/// request is issued for the same product; nothing retries automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TryOnStatus {
    /// No request has been made in this session.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request produced a result image.
    Succeeded,
    /// The last request failed.
    Failed,
}

impl TryOnStatus {
    /// Whether a request is currently in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}
