//! The shopper's own photo used as try-on input.
//!
//! The photo is kept as raw bytes plus its MIME type. For local storage it is
//! encoded as a self-describing data URI (`data:image/png;base64,...`), which
//! preserves the MIME type but not the original file name.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type assumed when a data URI does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Base name given to photos restored from storage.
const RESTORED_FILE_STEM: &str = "my_photo";

/// Errors that can occur when decoding a [`PersonImage`] from a data URI.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    /// The input does not start with `data:`.
    #[error("not a data URI")]
    MissingScheme,
    /// There is no `,` separating header and payload.
    #[error("data URI has no payload separator")]
    MissingPayload,
    /// The header does not declare base64 encoding.
    #[error("data URI is not base64-encoded")]
    NotBase64,
    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// A photo of the shopper.
///
/// `Debug` prints the size instead of the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonImage {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: String,
}

impl PersonImage {
    /// Create a photo from raw bytes.
    #[must_use]
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type, e.g. `image/jpeg`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File name sent along with the bytes in multipart uploads.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the image has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encode as a `data:<mime>;base64,<payload>` URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            STANDARD.encode(&self.bytes)
        )
    }

    /// Decode a photo from a data URI produced by [`Self::to_data_uri`].
    ///
    /// The original file name is not part of the URI, so the photo gets a
    /// generic `my_photo.<ext>` name derived from its MIME type.
    ///
    /// # Errors
    ///
    /// Returns a [`DataUriError`] if the input is not a base64 data URI or its
    /// payload is undecodable. An empty payload decodes to an empty photo.
    pub fn from_data_uri(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;

        let mut params = header.split(';');
        let mime_type = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_owned();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(DataUriError::NotBase64);
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))?;

        let file_name = format!("{RESTORED_FILE_STEM}.{}", extension_for_mime(&mime_type));
        Ok(Self {
            bytes,
            mime_type,
            file_name,
        })
    }
}

impl fmt::Debug for PersonImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonImage")
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Guess an image MIME type from a file extension.
#[must_use]
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF];

    #[test]
    fn test_data_uri_round_trip_preserves_bytes_and_mime() {
        let original = PersonImage::new(PNG_HEADER, "image/jpeg", "selfie.jpeg");
        let restored = PersonImage::from_data_uri(&original.to_data_uri()).unwrap();

        assert_eq!(restored.bytes(), original.bytes());
        assert_eq!(restored.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_restored_file_name_is_generic() {
        let original = PersonImage::new(PNG_HEADER, "image/jpeg", "selfie.jpeg");
        let restored = PersonImage::from_data_uri(&original.to_data_uri()).unwrap();
        assert_eq!(restored.file_name(), "my_photo.jpg");

        let png = PersonImage::new(PNG_HEADER, "image/png", "me.png");
        let restored = PersonImage::from_data_uri(&png.to_data_uri()).unwrap();
        assert_eq!(restored.file_name(), "my_photo.png");
    }

    #[test]
    fn test_encodes_expected_prefix() {
        let image = PersonImage::new(b"abc".to_vec(), "image/png", "a.png");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_missing_mime_defaults_to_png() {
        let image = PersonImage::from_data_uri("data:;base64,YWJj").unwrap();
        assert_eq!(image.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(image.bytes(), b"abc");
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert_eq!(
            PersonImage::from_data_uri("not a uri"),
            Err(DataUriError::MissingScheme)
        );
        assert_eq!(
            PersonImage::from_data_uri("data:image/png;base64"),
            Err(DataUriError::MissingPayload)
        );
        assert_eq!(
            PersonImage::from_data_uri("data:image/png,abc"),
            Err(DataUriError::NotBase64)
        );
        assert!(matches!(
            PersonImage::from_data_uri("data:image/png;base64,!!!"),
            Err(DataUriError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_empty_photo_round_trips() {
        let empty = PersonImage::new(Vec::new(), "image/webp", "e.webp");
        assert_eq!(empty.to_data_uri(), "data:image/webp;base64,");

        let restored = PersonImage::from_data_uri(&empty.to_data_uri()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.mime_type(), "image/webp");
    }

    #[test]
    fn test_debug_omits_bytes() {
        let image = PersonImage::new(vec![7_u8; 4096], "image/png", "a.png");
        let debug = format!("{image:?}");
        assert!(debug.contains("len: 4096"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("PNG"), Some("image/png"));
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("gif"), None);
    }
}
