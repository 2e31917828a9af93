//! CLI command implementations.

pub mod cart;
pub mod gallery;
pub mod photo;
pub mod products;
pub mod try_on;

use std::path::PathBuf;

use fitting_room_storefront::{ClientError, ConfigError, StorageError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Session operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Image file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image file type is not supported.
    #[error("Unsupported image type: {} (use png, jpeg or webp)", .0.display())]
    UnsupportedImage(PathBuf),

    /// Image file is empty.
    #[error("Image file is empty: {}", .0.display())]
    EmptyImage(PathBuf),
}

impl CliError {
    /// Whether the shopper already saw a notice for this error.
    pub const fn already_notified(&self) -> bool {
        match self {
            Self::Client(e) => e.already_notified(),
            _ => false,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Client(e.into())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::Client(e.into())
    }
}
