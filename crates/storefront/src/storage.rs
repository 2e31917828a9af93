//! Durable key/value storage for shopper state.
//!
//! Every store writes its full state under a single fixed key on each
//! mutation and reads it back once at startup. Values are opaque strings
//! (JSON documents or data URIs); there are no partial updates and no
//! versioning.
//!
//! # Backends
//!
//! - [`FileStorage`] - one file per key inside a data directory
//! - [`MemoryStorage`] - process-local map, for tests and throwaway sessions

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "ai_studio_cart";

/// Storage key for the encoded person photo.
pub const IMAGE_KEY: &str = "ai_studio_image";

/// Storage key for the serialized gallery.
pub const GALLERY_KEY: &str = "ai_studio_gallery";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A durable string key/value medium.
///
/// Implementations are shared between stores, so all methods take `&self`.
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileStorage
// =============================================================================

/// Stores each key as a file in a directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.tmp"));

        fs::write(&tmp, value).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get_item(CART_KEY).unwrap().is_none());

        storage.set_item(CART_KEY, "[]").unwrap();
        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[]"));

        storage.set_item(CART_KEY, "[1]").unwrap();
        assert_eq!(storage.get_item(CART_KEY).unwrap().as_deref(), Some("[1]"));

        storage.remove_item(CART_KEY).unwrap();
        assert!(storage.is_empty());
        storage.remove_item(CART_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item(GALLERY_KEY, "[{\"id\":1}]").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_item(GALLERY_KEY).unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
    }

    #[test]
    fn test_file_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.get_item(IMAGE_KEY).unwrap().is_none());
        storage.remove_item(IMAGE_KEY).unwrap();
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item(IMAGE_KEY, "data:image/png;base64,YWJj").unwrap();
        storage.remove_item(IMAGE_KEY).unwrap();
        assert!(storage.get_item(IMAGE_KEY).unwrap().is_none());
        assert!(!dir.path().join(IMAGE_KEY).exists());
    }

    #[test]
    fn test_file_storage_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::open(&nested).unwrap();
        storage.set_item(CART_KEY, "[]").unwrap();
        assert!(nested.join(CART_KEY).is_file());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }
}
