//! # Image Upload
//!
//! Reads a logo file into an embeddable `data:` URI and decodes such URIs
//! back into pixels.
//!
//! ```text
//! file ──read_data_uri()──▶ data:image/png;base64,iVBOR...
//!                                  │
//!                          decode_data_uri()
//!                                  ▼
//!                            DynamicImage
//! ```
//!
//! Loading is asynchronous. Nothing is cancelled: [`UploadSlot`] hands out
//! a ticket per upload and only the newest ticket may store its result, so
//! a slow earlier upload cannot overwrite a later one.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use std::path::Path;

use crate::error::{QrKitError, Result};

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Read an image file and return it as a base64 `data:` URI.
///
/// The MIME type is guessed from the extension; files that do not look like
/// images are refused.
pub async fn read_data_uri(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(QrKitError::Upload(format!(
            "{} is not an image ({})",
            path.display(),
            mime
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), %mime, "read overlay image");
    Ok(to_data_uri(&bytes, mime.essence_str()))
}

/// Wrap raw bytes in a base64 `data:` URI.
pub fn to_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("{}{}{},{}", DATA_PREFIX, mime, BASE64_MARKER, STANDARD.encode(bytes))
}

/// Extract the raw bytes from a base64 `data:` URI.
pub fn data_uri_bytes(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| QrKitError::Upload("not a data: URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| QrKitError::Upload("data: URI has no payload".to_string()))?;
    if !header.ends_with(BASE64_MARKER) {
        return Err(QrKitError::Upload(
            "only base64 data: URIs are supported".to_string(),
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| QrKitError::Upload(format!("invalid base64 payload: {}", e)))
}

/// Decode a base64 `data:` URI into an image.
pub fn decode_data_uri(uri: &str) -> Result<DynamicImage> {
    let bytes = data_uri_bytes(uri)?;
    image::load_from_memory(&bytes)
        .map_err(|e| QrKitError::Image(format!("Failed to decode overlay image: {}", e)))
}

/// Identifies one upload started on an [`UploadSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Latest-wins holder for the uploaded overlay image.
#[derive(Debug, Clone, Default)]
pub struct UploadSlot {
    generation: u64,
    current: Option<String>,
}

impl UploadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an upload. Any upload still in flight becomes stale.
    pub fn begin(&mut self) -> UploadTicket {
        self.generation += 1;
        UploadTicket(self.generation)
    }

    /// Store the result of an upload.
    ///
    /// Returns `Ok(true)` when the data URI was stored and `Ok(false)` when a
    /// newer upload has begun since (the result is dropped, even if it
    /// failed). A failed read of the newest upload is logged and returned;
    /// the previously stored image is kept.
    pub fn complete(&mut self, ticket: UploadTicket, result: Result<String>) -> Result<bool> {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, latest = self.generation, "dropping stale upload");
            return Ok(false);
        }
        match result {
            Ok(uri) => {
                self.current = Some(uri);
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "overlay image upload failed");
                Err(e)
            }
        }
    }

    /// The most recently stored data URI.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Write;

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255]));
        crate::render::to_png_bytes(&image).unwrap()
    }

    #[test]
    fn test_data_uri_round_trip() {
        let uri = to_data_uri(&png_bytes(), "image/png");
        assert!(uri.starts_with("data:image/png;base64,iVBOR"));
        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert!(matches!(data_uri_bytes("image/png;base64,AAAA"), Err(QrKitError::Upload(_))));
        assert!(matches!(data_uri_bytes("data:image/png;base64"), Err(QrKitError::Upload(_))));
        assert!(matches!(data_uri_bytes("data:text/plain,hello"), Err(QrKitError::Upload(_))));
        assert!(matches!(data_uri_bytes("data:image/png;base64,@@@"), Err(QrKitError::Upload(_))));
    }

    #[test]
    fn test_non_image_payload_is_image_error() {
        let uri = to_data_uri(b"definitely not a png", "image/png");
        assert!(matches!(decode_data_uri(&uri), Err(QrKitError::Image(_))));
    }

    #[tokio::test]
    async fn test_read_data_uri_from_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&png_bytes()).unwrap();

        let uri = read_data_uri(file.path()).await.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(decode_data_uri(&uri).is_ok());
    }

    #[tokio::test]
    async fn test_read_data_uri_refuses_non_images() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(read_data_uri(file.path()).await, Err(QrKitError::Upload(_))));
    }

    #[tokio::test]
    async fn test_read_data_uri_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(read_data_uri(&missing).await, Err(QrKitError::Io(_))));
    }

    #[test]
    fn test_latest_upload_wins() {
        let mut slot = UploadSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.complete(second, Ok("data:second".into())).unwrap());
        assert!(!slot.complete(first, Ok("data:first".into())).unwrap());
        assert_eq!(slot.current(), Some("data:second"));
    }

    #[test]
    fn test_failed_upload_keeps_previous_image() {
        let mut slot = UploadSlot::new();
        let ok = slot.begin();
        slot.complete(ok, Ok("data:kept".into())).unwrap();

        let failing = slot.begin();
        let result = slot.complete(failing, Err(QrKitError::Upload("boom".into())));
        assert!(result.is_err());
        assert_eq!(slot.current(), Some("data:kept"));
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut slot = UploadSlot::new();
        let stale = slot.begin();
        let _latest = slot.begin();
        assert!(!slot.complete(stale, Err(QrKitError::Upload("late".into()))).unwrap());
    }
}
