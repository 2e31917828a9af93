//! Catalog browsing commands.

use fitting_room_core::ProductId;
use fitting_room_storefront::{ClientError, Session};
use tracing::info;

/// List the catalog.
///
/// An unreachable catalog shows as empty.
pub async fn list(session: &Session) {
    let products = session.catalog().products().await;
    if products.is_empty() {
        info!("No products available");
        return;
    }

    for product in &products {
        let marker = if session.cart().contains(&product.id) {
            " (in cart)"
        } else {
            ""
        };
        info!(
            "{:<20} {:<30} {:>12} {}{marker}",
            product.id.as_str(),
            product.name,
            product.price.to_string(),
            product.category
        );
    }
}

/// Show one catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog.
pub async fn show(session: &Session, id: &ProductId) -> Result<(), ClientError> {
    let product = session
        .catalog()
        .product(id)
        .await
        .ok_or_else(|| ClientError::ProductNotFound(id.clone()))?;

    info!("{} ({})", product.name, product.id);
    info!("  Category: {}", product.category);
    info!("  Price:    {}", product.price);
    info!("  Image:    {}", product.image);
    info!("  Status:   {:?}", session.try_on_status(id));
    Ok(())
}
