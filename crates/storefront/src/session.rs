//! Shopper session.
//!
//! A [`Session`] owns everything one shopper's client needs: the cart and
//! photo store, the gallery, the catalog client and the try-on flow. It is
//! built once at startup and handed to the presentation layer; nothing in
//! this crate is reachable through globals.

use std::sync::Arc;

use fitting_room_core::{PersonImage, Product, ProductId, SavedFit, SavedFitId, TryOnStatus};
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::api::{CatalogClient, TryOnBackend, TryOnClient};
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::fitting::{FittingRoom, TryOnError};
use crate::gallery::GalleryStore;
use crate::notify::{Notice, Notifier};
use crate::storage::{FileStorage, LocalStorage};

/// Outcome of one try-on in a batch.
#[derive(Debug)]
pub struct TryOnOutcome {
    pub product: Product,
    pub result: std::result::Result<String, TryOnError>,
}

/// One shopper's client state.
pub struct Session<B = TryOnClient> {
    config: ClientConfig,
    cart: CartStore,
    gallery: GalleryStore,
    catalog: CatalogClient,
    fitting: FittingRoom<B>,
    notifier: Arc<dyn Notifier>,
}

impl Session<TryOnClient> {
    /// Open a session persisted in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir)?;
        info!(data_dir = %storage.dir().display(), "Opened local storage");
        Ok(Self::with_storage(config, Arc::new(storage), notifier))
    }

    /// Build a session on an existing storage backend, talking HTTP to
    /// `config.api_base`.
    #[must_use]
    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn LocalStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let backend = TryOnClient::new(&config, reqwest::Client::new());
        Self::with_backend(config, storage, backend, notifier)
    }
}

impl<B: TryOnBackend> Session<B> {
    /// Build a session with a custom try-on backend.
    #[must_use]
    pub fn with_backend(
        config: ClientConfig,
        storage: Arc<dyn LocalStorage>,
        backend: B,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let catalog = CatalogClient::new(&config, reqwest::Client::new());
        let cart = CartStore::load(Arc::clone(&storage));
        let gallery = GalleryStore::load(storage);
        let fitting = FittingRoom::new(backend, Arc::clone(&notifier));

        Self {
            config,
            cart,
            gallery,
            catalog,
            fitting,
            notifier,
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the cart and photo store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Get a reference to the gallery.
    #[must_use]
    pub const fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    /// Get a reference to the catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// Get a reference to the try-on flow.
    #[must_use]
    pub const fn fitting(&self) -> &FittingRoom<B> {
        &self.fitting
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product to the cart. Returns `false` if it was already there.
    pub fn add_to_cart(&mut self, product: Product) -> bool {
        self.cart.add(product)
    }

    /// Look a product up in the catalog and add it to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] if the catalog cannot be fetched and
    /// [`ClientError::ProductNotFound`] if it has no such product.
    pub async fn add_to_cart_by_id(&mut self, product_id: &ProductId) -> Result<bool> {
        let products = self.catalog.fetch_products().await?;
        let product = products
            .iter()
            .find(|p| &p.id == product_id)
            .cloned()
            .ok_or_else(|| ClientError::ProductNotFound(product_id.clone()))?;
        Ok(self.cart.add(product))
    }

    /// Remove a product from the cart. Returns `false` if it was not there.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        self.cart.remove(product_id)
    }

    /// Replace or clear the shopper's photo.
    pub fn set_person_image(&mut self, image: Option<PersonImage>) {
        self.cart.set_person_image(image);
    }

    // =========================================================================
    // Try-on
    // =========================================================================

    /// Try on a cart product with the stored photo.
    ///
    /// The photo is checked first, so a shopper without one is asked to
    /// upload it whatever the product.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::PhotoRequired`] without a photo,
    /// [`ClientError::NotInCart`] for unknown products, otherwise the
    /// [`TryOnError`] from the flow.
    pub async fn try_on(&self, product_id: &ProductId) -> Result<String> {
        let photo = self.require_photo()?;
        let product = self
            .cart
            .get(product_id)
            .ok_or_else(|| ClientError::NotInCart(product_id.clone()))?;

        Ok(self.fitting.try_on(product, Some(photo)).await?)
    }

    /// The stored photo, or a `PhotoRequired` notice and error.
    fn require_photo(&self) -> Result<&PersonImage> {
        match self.cart.person_image() {
            Some(photo) if !photo.is_empty() => Ok(photo),
            _ => {
                self.notifier.notify(Notice::PhotoRequired);
                Err(TryOnError::PhotoRequired.into())
            }
        }
    }

    /// Current try-on status of a product.
    #[must_use]
    pub fn try_on_status(&self, product_id: &ProductId) -> TryOnStatus {
        self.fitting.status(product_id)
    }

    /// Latest try-on result for a product.
    #[must_use]
    pub fn try_on_result(&self, product_id: &ProductId) -> Option<String> {
        self.fitting.result(product_id)
    }

    // =========================================================================
    // Gallery
    // =========================================================================

    /// Save a result image for `product` to the gallery and confirm it to the
    /// shopper.
    pub fn save_to_gallery(&mut self, product: &Product, result_url: &str) -> SavedFit {
        let entry = self.gallery.save(product, result_url);
        self.notifier.notify(Notice::SavedToGallery {
            product_name: product.name.clone(),
        });
        entry
    }

    /// Save the latest try-on result of a cart product to the gallery.
    ///
    /// The result stays available for further saves.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotInCart`] or [`ClientError::NoResult`].
    pub fn save_result(&mut self, product_id: &ProductId) -> Result<SavedFit> {
        let product = self
            .cart
            .get(product_id)
            .cloned()
            .ok_or_else(|| ClientError::NotInCart(product_id.clone()))?;
        let url = self
            .fitting
            .result(product_id)
            .ok_or_else(|| ClientError::NoResult(product_id.clone()))?;

        Ok(self.save_to_gallery(&product, &url))
    }

    /// Delete a gallery entry. Returns `false` if no entry had the ID.
    pub fn delete_from_gallery(&mut self, id: SavedFitId) -> bool {
        self.gallery.delete(id)
    }
}

impl<B: TryOnBackend> Session<B> {
    /// Try on several cart products at once.
    ///
    /// Each product runs as its own task; outcomes are returned in the order
    /// the products were given.
    ///
    /// # Errors
    ///
    /// Fails before sending anything if no photo is set (the shopper is
    /// notified once) or a product is not in the cart.
    pub async fn try_on_many(&self, product_ids: &[ProductId]) -> Result<Vec<TryOnOutcome>> {
        let photo = self.require_photo()?.clone();
        let products = product_ids
            .iter()
            .map(|id| {
                self.cart
                    .get(id)
                    .cloned()
                    .ok_or_else(|| ClientError::NotInCart(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut tasks = JoinSet::new();
        for (index, product) in products.into_iter().enumerate() {
            let fitting = self.fitting.clone();
            let photo = photo.clone();
            tasks.spawn(async move {
                let result = fitting.try_on(&product, Some(&photo)).await;
                (index, TryOnOutcome { product, result })
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!(error = %e, "Try-on task did not complete"),
            }
        }
        outcomes.sort_by_key(|(index, _)| *index);

        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }
}
