//! Cart commands.

use fitting_room_core::ProductId;
use fitting_room_storefront::{ClientError, Session};
use tracing::info;

/// List cart contents with the subtotal.
pub fn list(session: &Session) {
    let cart = session.cart();
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for product in cart.products() {
        info!(
            "{:<20} {:<30} {:>12}",
            product.id.as_str(),
            product.name,
            product.price.to_string()
        );
    }
    info!("{} item(s), subtotal {}", cart.len(), cart.subtotal());
}

/// Add a catalog product to the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched or has no such product.
pub async fn add(session: &mut Session, id: &ProductId) -> Result<(), ClientError> {
    if session.add_to_cart_by_id(id).await? {
        info!("Added {id} to the cart");
    } else {
        info!("{id} is already in the cart");
    }
    Ok(())
}

/// Remove a product from the cart.
pub fn remove(session: &mut Session, id: &ProductId) {
    if session.remove_from_cart(id) {
        info!("Removed {id} from the cart");
    } else {
        info!("{id} is not in the cart");
    }
}
