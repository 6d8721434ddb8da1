//! # Rendering Module
//!
//! Turns an encoded payload into a picture of a QR code.
//!
//! ## Modules
//!
//! - [`config`]: Colors, size, margin, error-correction level and title
//! - [`overlay`]: Logo placement geometry
//! - [`raster`]: The [`SymbolRenderer`] seam and the default bitmap renderer
//! - [`caption`]: Title text above the symbol
//! - [`color`]: Hex color parsing
//!
//! ## Usage Example
//!
//! ```
//! use qrkit::payload::ContentSelection;
//! use qrkit::render::{RasterRenderer, RenderConfig, RenderRequest, SymbolRenderer};
//!
//! let config = RenderConfig::default();
//! let value = ContentSelection::Url("example.com".into()).encode();
//!
//! let image = RasterRenderer.render(&RenderRequest::new(value, &config))?;
//! assert_eq!(image.width(), config.outer_size()?);
//! # Ok::<(), qrkit::QrKitError>(())
//! ```

pub mod caption;
pub mod color;
pub mod config;
pub mod overlay;
pub mod raster;

pub use caption::compose_card;
pub use color::Color;
pub use config::{ErrorCorrection, RenderConfig};
pub use overlay::{OverlayGeometry, OverlayImage, Placement};
pub use raster::{OverlaySpec, RasterRenderer, RenderRequest, SymbolRenderer};

use image::{DynamicImage, ImageFormat, RgbaImage};
use qrcode::QrCode;
use qrcode::render::svg;
use std::io::Cursor;
use std::path::Path;

use crate::error::{QrKitError, Result};

/// Encode a bitmap as PNG bytes.
pub fn to_png_bytes(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| QrKitError::Image(format!("Failed to encode PNG: {}", e)))?;
    Ok(buf)
}

/// Save a bitmap as a PNG file.
pub fn save_png(path: &Path, image: &RgbaImage) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| QrKitError::Image(format!("Failed to save PNG: {}", e)))?;
    tracing::info!(path = %path.display(), width = image.width(), "saved PNG");
    Ok(())
}

/// Render the request as an SVG document.
///
/// Vector output has no overlay and no margin; the quiet zone is included.
pub fn render_svg(request: &RenderRequest) -> Result<String> {
    if request.overlay.is_some() {
        tracing::warn!("SVG output ignores the overlay image");
    }

    let code = QrCode::with_error_correction_level(
        request.value.as_bytes(),
        request.error_level.to_ec_level(),
    )?;
    let dark = request.foreground.to_string();
    let light = request.background.to_string();

    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(request.size, request.size)
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .build())
}
