//! User-facing notices.
//!
//! The flows in this crate never talk to a screen directly. Anything the
//! shopper must be told (a missing photo, a failed try-on, a saved result)
//! goes through a [`Notifier`] supplied by the presentation layer.

use std::fmt;

/// Something the shopper should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A try-on was requested before a photo was uploaded.
    PhotoRequired,
    /// The try-on service reported an error for a product.
    TryOnFailed {
        product_name: String,
        message: String,
    },
    /// The try-on service could not be reached or answered garbage.
    ServerUnreachable,
    /// A try-on result was saved to the gallery.
    SavedToGallery { product_name: String },
}

impl Notice {
    /// Whether the notice reports a problem rather than a confirmation.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::SavedToGallery { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhotoRequired => f.write_str("Please upload a photo of yourself first!"),
            Self::TryOnFailed {
                product_name,
                message,
            } => write!(f, "{product_name} error: {message}"),
            Self::ServerUnreachable => f.write_str("Could not connect to the AI server"),
            Self::SavedToGallery { product_name } => {
                write!(f, "Saved {product_name} to your album!")
            }
        }
    }
}

/// Receives notices for the shopper.
pub trait Notifier: Send + Sync {
    /// Show a notice.
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!(notice = ?notice, "{notice}");
        } else {
            tracing::info!("{notice}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Mutex, PoisonError};

    use super::{Notice, Notifier};

    /// Collects notices for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        pub fn notices(&self) -> Vec<Notice> {
            self.notices
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(notice);
        }
    }
}
