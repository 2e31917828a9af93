//! Cart and person-photo store.
//!
//! Holds the products the shopper selected and the photo used for try-ons.
//! The product list and the photo are persisted under separate keys, each
//! rewritten in full whenever it changes.
//!
//! # Persistence
//!
//! - Cart: JSON array of products under [`CART_KEY`]
//! - Photo: data URI under [`IMAGE_KEY`]; clearing the photo removes the key
//!
//! A missing or unreadable value at startup yields an empty cart / no photo.
//! The problem is logged and never surfaced to the shopper.

use std::collections::HashSet;
use std::sync::Arc;

use fitting_room_core::{PersonImage, Price, Product, ProductId};
use tracing::{debug, error, warn};

use crate::storage::{CART_KEY, IMAGE_KEY, LocalStorage};

/// Selected products plus the shopper's photo.
pub struct CartStore {
    storage: Arc<dyn LocalStorage>,
    products: Vec<Product>,
    person_image: Option<PersonImage>,
}

impl CartStore {
    /// Restore the cart and photo from storage.
    #[must_use]
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let products = restore_products(storage.as_ref());
        let person_image = restore_person_image(storage.as_ref());

        debug!(
            items = products.len(),
            has_photo = person_image.is_some(),
            "Cart restored"
        );

        Self {
            storage,
            products,
            person_image,
        }
    }

    /// Products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether a product with this ID is in the cart.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Look up a cart product by ID.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == product_id)
    }

    /// Sum of all product prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.products.iter().map(|p| p.price).sum()
    }

    /// The shopper's photo, if one has been set.
    #[must_use]
    pub const fn person_image(&self) -> Option<&PersonImage> {
        self.person_image.as_ref()
    }

    /// Append a product unless one with the same ID is already present.
    ///
    /// Returns `true` if the product was added. Adding a duplicate changes
    /// nothing and writes nothing.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            debug!(product_id = %product.id, "Product already in cart");
            return false;
        }

        debug!(product_id = %product.id, "Adding product to cart");
        self.products.push(product);
        self.persist_products();
        true
    }

    /// Remove every entry with the given ID.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| &p.id != product_id);

        if self.products.len() == before {
            return false;
        }

        debug!(product_id = %product_id, "Removed product from cart");
        self.persist_products();
        true
    }

    /// Replace the shopper's photo, or clear it with `None`.
    pub fn set_person_image(&mut self, image: Option<PersonImage>) {
        self.person_image = image;

        let result = match &self.person_image {
            Some(image) => {
                debug!(mime_type = image.mime_type(), bytes = image.len(), "Storing photo");
                self.storage.set_item(IMAGE_KEY, &image.to_data_uri())
            }
            None => {
                debug!("Clearing stored photo");
                self.storage.remove_item(IMAGE_KEY)
            }
        };

        if let Err(e) = result {
            error!(error = %e, "Failed to persist photo");
        }
    }

    fn persist_products(&self) {
        let json = match serde_json::to_string(&self.products) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(CART_KEY, &json) {
            error!(error = %e, "Failed to persist cart");
        }
    }
}

fn restore_products(storage: &dyn LocalStorage) -> Vec<Product> {
    let raw = match storage.get_item(CART_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart");
            return Vec::new();
        }
    };

    let products: Vec<Product> = match serde_json::from_str(&raw) {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Failed to parse stored cart");
            return Vec::new();
        }
    };

    // Keep the first occurrence of each ID if the stored value was edited by hand.
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

fn restore_person_image(storage: &dyn LocalStorage) -> Option<PersonImage> {
    let raw = match storage.get_item(IMAGE_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "Failed to read stored photo");
            return None;
        }
    };

    match PersonImage::from_data_uri(&raw) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(error = %e, "Failed to parse stored photo");
            None
        }
    }
}
