//! Core types for Fitting Room.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod id;
pub mod image;
pub mod price;
pub mod product;
pub mod saved_fit;
pub mod status;

pub use id::{ProductId, SavedFitId};
pub use image::{DataUriError, PersonImage, mime_for_extension};
pub use price::{Price, PriceError};
pub use product::Product;
pub use saved_fit::SavedFit;
pub use status::TryOnStatus;
