//! Saved try-on results ("my album").
//!
//! Entries are kept newest first and rewritten in full under
//! [`GALLERY_KEY`] on every change. Entry IDs are millisecond timestamps,
//! bumped past the previous ID when two saves land in the same millisecond.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local};
use fitting_room_core::{Product, SavedFit, SavedFitId};
use tracing::{debug, error, warn};

use crate::storage::{GALLERY_KEY, LocalStorage};

/// Persisted list of saved try-on results.
pub struct GalleryStore {
    storage: Arc<dyn LocalStorage>,
    entries: Vec<SavedFit>,
    last_id: i64,
}

impl GalleryStore {
    /// Restore the gallery from storage.
    #[must_use]
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let entries = restore_entries(storage.as_ref());
        let last_id = entries.iter().map(|e| e.id.as_i64()).max().unwrap_or(0);

        debug!(entries = entries.len(), "Gallery restored");

        Self {
            storage,
            entries,
            last_id,
        }
    }

    /// Entries, most recent first.
    #[must_use]
    pub fn entries(&self) -> &[SavedFit] {
        &self.entries
    }

    /// Number of saved entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gallery is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by ID.
    #[must_use]
    pub fn get(&self, id: SavedFitId) -> Option<&SavedFit> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Save a try-on result for `product`.
    ///
    /// The new entry goes to the front of the gallery and the whole gallery is
    /// persisted.
    pub fn save(&mut self, product: &Product, result_url: &str) -> SavedFit {
        self.save_at(product, result_url, Local::now())
    }

    fn save_at(&mut self, product: &Product, result_url: &str, now: DateTime<Local>) -> SavedFit {
        let id = self.next_id(now.timestamp_millis());

        let entry = SavedFit {
            id,
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            image_url: result_url.to_string(),
            date: now.format("%Y-%m-%d").to_string(),
        };

        debug!(entry_id = %id, product_id = %product.id, "Saving try-on result to gallery");
        self.entries.insert(0, entry.clone());
        self.persist();
        entry
    }

    /// Delete the entry with the given ID.
    ///
    /// Returns `true` if an entry was removed. Deleting an unknown ID changes
    /// nothing and writes nothing.
    pub fn delete(&mut self, id: SavedFitId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);

        if self.entries.len() == before {
            return false;
        }

        debug!(entry_id = %id, "Deleted gallery entry");
        self.persist();
        true
    }

    fn next_id(&mut self, now_millis: i64) -> SavedFitId {
        let id = now_millis.max(self.last_id.saturating_add(1));
        self.last_id = id;
        SavedFitId::new(id)
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize gallery");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(GALLERY_KEY, &json) {
            error!(error = %e, "Failed to persist gallery");
        }
    }
}

fn restore_entries(storage: &dyn LocalStorage) -> Vec<SavedFit> {
    let raw = match storage.get_item(GALLERY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored gallery");
            return Vec::new();
        }
    };

    let entries: Vec<SavedFit> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to parse stored gallery");
            return Vec::new();
        }
    };

    // Keep the first occurrence of each ID if the stored value was edited by hand.
    let mut seen = HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id)).collect()
}
