//! # Error Types
//!
//! This module defines error types used throughout the qrkit library.
//!
//! Payload formatting never fails; everything here comes from rendering,
//! image handling, uploads, or reading a form.

use thiserror::Error;

/// Main error type for qrkit operations
#[derive(Debug, Error)]
pub enum QrKitError {
    /// The payload could not be encoded into a QR symbol (usually too long
    /// for the selected error-correction level)
    #[error("Encode error: {0}")]
    Encode(String),

    /// Image decoding, resizing or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Upload error (unreadable file, non-image type, malformed data URI)
    #[error("Upload error: {0}")]
    Upload(String),

    /// Invalid form value (color, content kind, form file)
    #[error("Invalid config: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, QrKitError>;

impl From<image::ImageError> for QrKitError {
    fn from(err: image::ImageError) -> Self {
        QrKitError::Image(err.to_string())
    }
}

impl From<qrcode::types::QrError> for QrKitError {
    fn from(err: qrcode::types::QrError) -> Self {
        QrKitError::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for QrKitError {
    fn from(err: serde_json::Error) -> Self {
        QrKitError::Config(format!("form file: {}", err))
    }
}
