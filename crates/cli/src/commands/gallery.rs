//! Gallery commands.

use fitting_room_core::SavedFitId;
use fitting_room_storefront::Session;
use tracing::info;

/// List saved results, newest first.
pub fn list(session: &Session) {
    let gallery = session.gallery();
    if gallery.is_empty() {
        info!("Gallery is empty");
        return;
    }

    for entry in gallery.entries() {
        info!(
            "{:<15} {} {:<30} {}",
            entry.id.to_string(),
            entry.date, entry.product_name, entry.image_url
        );
    }
}

/// Delete a saved result.
pub fn delete(session: &mut Session, id: SavedFitId) {
    if session.delete_from_gallery(id) {
        info!("Deleted gallery entry {id}");
    } else {
        info!("No gallery entry with ID {id}");
    }
}
