//! Try-on request flow.
//!
//! Tracks one [`TryOnStatus`] per product and the latest result image for
//! each product that succeeded. Requests for different products run
//! independently and may overlap; a second request for a product that is
//! still pending is ignored.
//!
//! The state lock is only held while a status changes, never across the
//! network call.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fitting_room_core::{PersonImage, Product, ProductId, TryOnStatus};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, TryOnBackend, TryOnRequest};
use crate::notify::{Notice, Notifier};

/// Why a try-on did not produce a result.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// No photo has been uploaded. Nothing was sent.
    #[error("a photo is required before trying on products")]
    PhotoRequired,

    /// A request for this product is already in flight. Nothing was sent.
    #[error("try-on already in progress for {0}")]
    AlreadyPending(ProductId),

    /// The request was sent and failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Per-product try-on state machine.
///
/// Cloning is cheap; clones share state, so a clone can be moved into a
/// spawned task while the original keeps answering status queries.
pub struct FittingRoom<B> {
    inner: Arc<FittingRoomInner<B>>,
}

struct FittingRoomInner<B> {
    backend: B,
    notifier: Arc<dyn Notifier>,
    state: Mutex<FittingState>,
}

#[derive(Default)]
struct FittingState {
    statuses: HashMap<ProductId, TryOnStatus>,
    results: HashMap<ProductId, String>,
}

impl<B> Clone for FittingRoom<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: TryOnBackend> FittingRoom<B> {
    /// Create a fitting room with no requests made yet.
    #[must_use]
    pub fn new(backend: B, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            inner: Arc::new(FittingRoomInner {
                backend,
                notifier,
                state: Mutex::new(FittingState::default()),
            }),
        }
    }

    /// Current status for a product; `Idle` if it was never tried on.
    #[must_use]
    pub fn status(&self, product_id: &ProductId) -> TryOnStatus {
        self.lock()
            .statuses
            .get(product_id)
            .copied()
            .unwrap_or_default()
    }

    /// Latest result image for a product, if any request succeeded.
    ///
    /// A result survives later failed attempts for the same product.
    #[must_use]
    pub fn result(&self, product_id: &ProductId) -> Option<String> {
        self.lock().results.get(product_id).cloned()
    }

    /// Snapshot of all result images keyed by product.
    #[must_use]
    pub fn results(&self) -> HashMap<ProductId, String> {
        self.lock().results.clone()
    }

    /// Products with a request in flight.
    #[must_use]
    pub fn pending(&self) -> Vec<ProductId> {
        let mut pending: Vec<_> = self
            .lock()
            .statuses
            .iter()
            .filter(|(_, status)| status.is_pending())
            .map(|(id, _)| id.clone())
            .collect();
        pending.sort();
        pending
    }

    /// Try `product` on the shopper in `photo`.
    ///
    /// On success the result URL is recorded for the product and returned.
    /// Failures are reported to the shopper through the notifier; a request
    /// ignored because one is already pending is not. If the returned future
    /// is dropped before the service answers, the product is marked `Failed`.
    ///
    /// # Errors
    ///
    /// - [`TryOnError::PhotoRequired`] if `photo` is `None` or empty
    /// - [`TryOnError::AlreadyPending`] if a request for the product is in flight
    /// - [`TryOnError::Api`] if the request failed or the service refused it
    pub async fn try_on(
        &self,
        product: &Product,
        photo: Option<&PersonImage>,
    ) -> Result<String, TryOnError> {
        let Some(photo) = photo.filter(|p| !p.is_empty()) else {
            debug!(product_id = %product.id, "Try-on requested without a photo");
            self.inner.notifier.notify(Notice::PhotoRequired);
            return Err(TryOnError::PhotoRequired);
        };

        let Some(pending) = self.begin(&product.id) else {
            debug!(product_id = %product.id, "Try-on already pending, ignoring request");
            return Err(TryOnError::AlreadyPending(product.id.clone()));
        };

        let request = TryOnRequest::new(product.id.clone(), photo.clone());
        let outcome = self.inner.backend.try_on(request).await;

        match outcome {
            Ok(url) => {
                info!(product_id = %product.id, result_url = %url, "Try-on succeeded");
                pending.succeed(&url);
                Ok(url)
            }
            Err(e) => {
                if e.is_rejection() {
                    info!(product_id = %product.id, error = %e, "Try-on rejected by service");
                } else {
                    warn!(product_id = %product.id, error = %e, "Try-on failed");
                }
                pending.fail();
                self.inner.notifier.notify(failure_notice(product, &e));
                Err(TryOnError::Api(e))
            }
        }
    }

    /// Move a product to `Pending`. Returns `None` if it already was.
    fn begin<'a>(&'a self, product_id: &'a ProductId) -> Option<PendingGuard<'a>> {
        let mut state = self.lock();
        let status = state.statuses.entry(product_id.clone()).or_default();
        if status.is_pending() {
            return None;
        }
        *status = TryOnStatus::Pending;

        Some(PendingGuard {
            state: &self.inner.state,
            product_id,
            armed: true,
        })
    }

    fn lock(&self) -> MutexGuard<'_, FittingState> {
        lock(&self.inner.state)
    }
}

/// A product's `Pending` status, held for the duration of one request.
///
/// Settled by [`Self::succeed`] or [`Self::fail`]; dropping it unsettled
/// (the request future was cancelled or its task aborted) marks the product
/// `Failed` so later requests are not refused.
struct PendingGuard<'a> {
    state: &'a Mutex<FittingState>,
    product_id: &'a ProductId,
    armed: bool,
}

impl PendingGuard<'_> {
    fn succeed(mut self, url: &str) {
        let mut state = lock(self.state);
        state
            .statuses
            .insert(self.product_id.clone(), TryOnStatus::Succeeded);
        state.results.insert(self.product_id.clone(), url.to_string());
        self.armed = false;
    }

    fn fail(mut self) {
        self.set_failed();
        self.armed = false;
    }

    fn set_failed(&self) {
        lock(self.state)
            .statuses
            .insert(self.product_id.clone(), TryOnStatus::Failed);
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(product_id = %self.product_id, "Try-on abandoned before the service answered");
            self.set_failed();
        }
    }
}

fn lock(state: &Mutex<FittingState>) -> MutexGuard<'_, FittingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn failure_notice(product: &Product, error: &ApiError) -> Notice {
    match error {
        ApiError::Rejected(message) => Notice::TryOnFailed {
            product_name: product.name.clone(),
            message: message.clone(),
        },
        _ => Notice::ServerUnreachable,
    }
}
