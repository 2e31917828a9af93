//! Try-on command.
//!
//! Every requested product runs concurrently; each result is reported as it
//! is known and failures do not affect the other products.

use fitting_room_core::ProductId;
use fitting_room_storefront::{Session, TryOnError};
use tracing::{info, warn};

use super::CliError;

/// Try products on the stored photo.
///
/// With no IDs, every product in the cart is tried on. With `save`, each
/// successful result is added to the gallery.
///
/// # Errors
///
/// Returns an error if a product is not in the cart or no photo is set.
pub async fn run(session: &mut Session, ids: Vec<ProductId>, save: bool) -> Result<(), CliError> {
    let ids = if ids.is_empty() {
        session
            .cart()
            .products()
            .iter()
            .map(|p| p.id.clone())
            .collect()
    } else {
        ids
    };

    if ids.is_empty() {
        info!("Cart is empty, nothing to try on");
        return Ok(());
    }

    info!(count = ids.len(), "Trying on products");
    let outcomes = session.try_on_many(&ids).await?;

    let mut succeeded = 0_usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(url) => {
                succeeded += 1;
                info!("{}: {url}", outcome.product.name);
                if save {
                    session.save_to_gallery(&outcome.product, &url);
                }
            }
            // Already reported through a notice.
            Err(TryOnError::Api(_) | TryOnError::PhotoRequired) => {}
            Err(e @ TryOnError::AlreadyPending(_)) => warn!("{e}"),
        }
    }

    info!("{succeeded} of {} try-on(s) succeeded", ids.len());
    Ok(())
}
