//! Catalog API client.
//!
//! The catalog is a single unpaginated listing. Successful listings are
//! cached in memory for 5 minutes; failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use fitting_room_core::{Product, ProductId};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use super::{ApiError, body_excerpt};
use crate::config::ClientConfig;

const PRODUCTS_CACHE_KEY: &str = "products";

/// Client for the catalog listing endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &ClientConfig, client: reqwest::Client) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.products_url(),
                cache,
            }),
        }
    }

    /// Fetch the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a JSON array of products.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.inner.cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let response = self.inner.client.get(&self.inner.endpoint).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                status = %status,
                body = %body_excerpt(&body),
                "Catalog returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body_excerpt(&body),
            });
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %body_excerpt(&body), "Failed to parse catalog response");
            e
        })?;
        debug!(count = products.len(), "Fetched catalog");

        let products = Arc::new(products);
        self.inner
            .cache
            .insert(PRODUCTS_CACHE_KEY, Arc::clone(&products))
            .await;

        Ok(products)
    }

    /// Product listing for display.
    ///
    /// An unreachable or misbehaving catalog yields an empty list; the error
    /// is logged.
    pub async fn products(&self) -> Vec<Product> {
        match self.fetch_products().await {
            Ok(products) => products.as_ref().clone(),
            Err(e) => {
                warn!(error = %e, "Failed to load catalog");
                Vec::new()
            }
        }
    }

    /// Look up a single product in the listing.
    pub async fn product(&self, id: &ProductId) -> Option<Product> {
        match self.fetch_products().await {
            Ok(products) => products.iter().find(|p| &p.id == id).cloned(),
            Err(e) => {
                warn!(error = %e, product_id = %id, "Failed to load catalog");
                None
            }
        }
    }

    /// Drop the cached listing so the next call refetches.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(PRODUCTS_CACHE_KEY).await;
    }
}
