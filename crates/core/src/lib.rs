//! Fitting Room Core - Shared domain types.
//!
//! This crate provides the types used across all Fitting Room components:
//! - `storefront` - Shopper-side state (cart, photo, gallery) and API clients
//! - `cli` - Command-line shell driving a storefront session
//!
//! # Architecture
//!
//! The core crate contains only types and pure conversions - no I/O, no
//! storage access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product and gallery records, type-safe IDs, prices, the
//!   person photo and try-on status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
