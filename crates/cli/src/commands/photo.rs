//! Photo commands.

use std::path::Path;

use fitting_room_core::{PersonImage, mime_for_extension};
use fitting_room_storefront::Session;
use tracing::info;

use super::CliError;

/// Read an image file into a photo.
///
/// The MIME type comes from the file extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is empty, or is not a png,
/// jpeg or webp image.
pub async fn load_image(path: &Path) -> Result<PersonImage, CliError> {
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| CliError::UnsupportedImage(path.to_path_buf()))?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;
    if bytes.is_empty() {
        return Err(CliError::EmptyImage(path.to_path_buf()));
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("photo")
        .to_string();

    Ok(PersonImage::new(bytes, mime_type, file_name))
}

/// Use an image file as the shopper's photo.
///
/// # Errors
///
/// See [`load_image`].
pub async fn set(session: &mut Session, path: &Path) -> Result<(), CliError> {
    let image = load_image(path).await?;
    info!(
        bytes = image.len(),
        mime_type = image.mime_type(),
        "Photo set from {}",
        path.display()
    );
    session.set_person_image(Some(image));
    Ok(())
}

/// Remove the stored photo.
pub fn clear(session: &mut Session) {
    session.set_person_image(None);
    info!("Photo cleared");
}

/// Show the stored photo.
pub fn show(session: &Session) {
    match session.cart().person_image() {
        Some(image) => info!(
            "{} ({}, {} bytes)",
            image.file_name(),
            image.mime_type(),
            image.len()
        ),
        None => info!("No photo set"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_image_infers_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("me.JPG");
        tokio::fs::write(&path, [0xFF, 0xD8, 0xFF]).await.unwrap();

        let image = load_image(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.file_name(), "me.JPG");
        assert_eq!(image.bytes(), [0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_load_image_rejects_unknown_extension() {
        let result = load_image(Path::new("notes.txt")).await;
        assert!(matches!(result, Err(CliError::UnsupportedImage(_))));
    }

    #[tokio::test]
    async fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/me.png")).await;
        assert!(matches!(result, Err(CliError::ReadImage { .. })));
    }
}
