//! Fitting Room storefront client library.
//!
//! Shopper-side state and flows for a virtual try-on storefront:
//!
//! - [`cart::CartStore`] - cart contents and the shopper's photo
//! - [`gallery::GalleryStore`] - saved try-on results
//! - [`fitting::FittingRoom`] - per-product try-on requests and results
//! - [`api`] - HTTP clients for the catalog and the inference service
//!
//! Everything is wired together by [`session::Session`], which the
//! presentation layer builds once and owns.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fitting_room_storefront::{ClientConfig, Session, TracingNotifier};
//!
//! let config = ClientConfig::from_env()?;
//! let mut session = Session::open(config, Arc::new(TracingNotifier))?;
//! session.add_to_cart_by_id(&"p1".into()).await?;
//! let url = session.try_on(&"p1".into()).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod fitting;
pub mod gallery;
pub mod notify;
pub mod session;
pub mod storage;

pub use api::{ApiError, CatalogClient, TryOnBackend, TryOnClient};
pub use cart::CartStore;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use fitting::{FittingRoom, TryOnError};
pub use gallery::GalleryStore;
pub use notify::{Notice, Notifier, TracingNotifier};
pub use session::{Session, TryOnOutcome};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
