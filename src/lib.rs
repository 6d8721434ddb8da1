//! # qrkit - QR Code Payloads and Rendering
//!
//! qrkit turns form input (text, contact cards, Wi-Fi credentials, map
//! queries, ...) into QR codes. It provides:
//!
//! - **Payload formatting**: the exact strings scanners expect for vCard,
//!   `mailto:`, `tel:`, `sms:`, `WIFI:`, map and profile links
//! - **Rendering**: colored bitmaps with margin, title caption and an
//!   optional logo overlay
//! - **Uploads**: image files to `data:` URIs and back
//!
//! ## Quick Start
//!
//! ```
//! use qrkit::{
//!     payload::{ContentSelection, VCardFields},
//!     render::{RasterRenderer, RenderConfig, RenderRequest, SymbolRenderer},
//! };
//!
//! let card = ContentSelection::VCard(VCardFields {
//!     first_name: "Ada".into(),
//!     last_name: "Lovelace".into(),
//!     ..Default::default()
//! });
//!
//! let config = RenderConfig::default();
//! let request = RenderRequest::new(card.encode(), &config);
//! let image = RasterRenderer.render(&request)?;
//! assert_eq!(image.width(), 208);
//!
//! # Ok::<(), qrkit::QrKitError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`payload`] | Content kinds and payload formatting |
//! | [`collector`] | Form field state |
//! | [`render`] | Render settings, overlay geometry, bitmap renderer |
//! | [`upload`] | Image files and data URIs |
//! | [`session`] | One form's state, end to end |
//! | [`error`] | Error types |

pub mod collector;
pub mod error;
pub mod payload;
pub mod render;
pub mod session;
pub mod upload;

// Re-exports for convenience
pub use error::QrKitError;
pub use payload::{ContentKind, ContentSelection};
pub use render::{RasterRenderer, RenderConfig, SymbolRenderer};
pub use session::Session;
