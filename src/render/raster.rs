//! # Raster Symbol Renderer
//!
//! Turns an encoded payload into an RGBA bitmap. The QR matrix itself comes
//! from the `qrcode` crate; this module only lays it out, colors it and
//! composites the optional logo.
//!
//! ## Layout
//!
//! ```text
//! ├ margin ┼──────────────── size ────────────────┼ margin ┤
//!          │ quiet zone │   QR modules   │ quiet zone │
//!          │  4 modules │                │  4 modules │
//! ```
//!
//! Modules are mapped to pixels by nearest neighbour, so any `size` works,
//! not only multiples of the module count.
//!
//! ## Overlay
//!
//! 1. Every module whose cell touches the overlay rectangle is excavated
//!    (painted with the background color).
//! 2. The logo is scaled to the overlay dimensions and alpha-blended on top,
//!    scaled by the overlay opacity.
//! 3. Logo pixels outside the symbol are never produced: only the visible
//!    part of the logo is cropped and resized.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use qrcode::QrCode;

use super::color::Color;
use super::config::{ErrorCorrection, RenderConfig, outer_edge};
use super::overlay::{OverlayGeometry, PixelRect};
use crate::error::{QrKitError, Result};

/// Quiet zone on each side of the matrix, in modules.
pub const QUIET_ZONE_MODULES: usize = 4;

/// A decoded logo and where to put it.
#[derive(Debug, Clone)]
pub struct OverlaySpec {
    pub image: DynamicImage,
    pub geometry: OverlayGeometry,
    /// Clear the modules under the logo before drawing it.
    pub excavate: bool,
}

/// Everything the symbol renderer needs for one QR code.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// The encoded payload.
    pub value: String,
    /// Symbol edge length in pixels, quiet zone included.
    pub size: u32,
    pub foreground: Color,
    pub background: Color,
    pub error_level: ErrorCorrection,
    /// Background border around the symbol, in pixels.
    pub margin: u32,
    pub overlay: Option<OverlaySpec>,
}

impl RenderRequest {
    /// Build a request from an encoded value and the form's render settings.
    pub fn new(value: impl Into<String>, config: &RenderConfig) -> Self {
        Self {
            value: value.into(),
            size: config.size,
            foreground: config.foreground,
            background: config.background,
            error_level: config.error_level,
            margin: config.margin,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: OverlaySpec) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

/// The external symbol-rendering collaborator.
///
/// Implementations consume a [`RenderRequest`] and return the finished
/// bitmap, margin included.
pub trait SymbolRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RgbaImage>;
}

/// Default renderer backed by `qrcode` and `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterRenderer;

impl SymbolRenderer for RasterRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RgbaImage> {
        if request.size == 0 {
            return Err(QrKitError::Config("symbol size must be positive".to_string()));
        }
        let outer = outer_edge(request.size, request.margin)?;

        let code = QrCode::with_error_correction_level(
            request.value.as_bytes(),
            request.error_level.to_ec_level(),
        )?;
        let grid = ModuleGrid::new(&code);

        tracing::debug!(
            modules = grid.width,
            size = request.size,
            level = %request.error_level,
            "rendering QR symbol"
        );
        if grid.total() > request.size as usize {
            tracing::warn!(
                modules = grid.total(),
                size = request.size,
                "symbol has more modules than pixels, output will not scan"
            );
        }

        let excavated = request
            .overlay
            .as_ref()
            .filter(|overlay| overlay.excavate)
            .map(|overlay| grid.span(overlay.geometry.bounds(), request.size));

        let size = request.size;
        let total = grid.total();
        let mut symbol = RgbaImage::from_pixel(size, size, request.background.to_rgba());
        let foreground = request.foreground.to_rgba();

        for py in 0..size {
            let my = py as usize * total / size as usize;
            for px in 0..size {
                let mx = px as usize * total / size as usize;
                if excavated.is_some_and(|span| span.contains(mx, my)) {
                    continue;
                }
                if grid.is_dark(mx, my) {
                    symbol.put_pixel(px, py, foreground);
                }
            }
        }

        if let Some(overlay) = &request.overlay {
            blend_overlay(&mut symbol, overlay);
        }

        Ok(add_margin(symbol, outer, request.margin, request.background))
    }
}

/// The QR matrix surrounded by its quiet zone.
struct ModuleGrid<'a> {
    code: &'a QrCode,
    width: usize,
}

impl<'a> ModuleGrid<'a> {
    fn new(code: &'a QrCode) -> Self {
        Self {
            code,
            width: code.width(),
        }
    }

    /// Edge length in modules, quiet zone included.
    fn total(&self) -> usize {
        self.width + 2 * QUIET_ZONE_MODULES
    }

    fn is_dark(&self, mx: usize, my: usize) -> bool {
        let (Some(x), Some(y)) = (
            mx.checked_sub(QUIET_ZONE_MODULES),
            my.checked_sub(QUIET_ZONE_MODULES),
        ) else {
            return false;
        };
        x < self.width && y < self.width && self.code[(x, y)] == qrcode::Color::Dark
    }

    /// Modules whose cells intersect `rect` on a symbol of `size` pixels.
    fn span(&self, rect: PixelRect, size: u32) -> ModuleSpan {
        let total = self.total();
        if !rect.intersects_square(size) {
            return ModuleSpan::default();
        }

        let scale = total as f64 / f64::from(size);
        let to_module = |px: i64, round_up: bool| {
            let m = px as f64 * scale;
            let m = if round_up { m.ceil() } else { m.floor() };
            m.clamp(0.0, total as f64) as usize
        };

        ModuleSpan {
            x0: to_module(rect.left, false),
            x1: to_module(rect.right(), true),
            y0: to_module(rect.top, false),
            y1: to_module(rect.bottom(), true),
        }
    }
}

/// Half-open module range `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ModuleSpan {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl ModuleSpan {
    fn contains(&self, mx: usize, my: usize) -> bool {
        mx >= self.x0 && mx < self.x1 && my >= self.y0 && my < self.y1
    }
}

fn blend_overlay(symbol: &mut RgbaImage, overlay: &OverlaySpec) {
    let rect = overlay.geometry.bounds();
    if !rect.intersects_square(symbol.width()) {
        tracing::debug!(?rect, "overlay lies outside the symbol, skipping");
        return;
    }

    let source = overlay.image.to_rgba8();
    if source.width() == 0 || source.height() == 0 {
        return;
    }

    // Resize only the part of the logo that lands on the symbol.
    let edge = i64::from(symbol.width());
    let (x0, x1) = (rect.left.max(0), rect.right().min(edge));
    let (y0, y1) = (rect.top.max(0), rect.bottom().min(edge));
    let (sx, sw) = source_span(x0 - rect.left, x1 - rect.left, rect.width, source.width());
    let (sy, sh) = source_span(y0 - rect.top, y1 - rect.top, rect.height, source.height());
    let visible = imageops::crop_imm(&source, sx, sy, sw, sh).to_image();
    let logo = imageops::resize(&visible, (x1 - x0) as u32, (y1 - y0) as u32, FilterType::Triangle);

    let opacity = overlay.geometry.opacity;
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };

    for (ix, iy, src) in logo.enumerate_pixels() {
        let x = x0 + i64::from(ix);
        let y = y0 + i64::from(iy);

        let alpha = f32::from(src[3]) / 255.0 * opacity;
        let dst = symbol.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let mixed = f32::from(src[c]) * alpha + f32::from(dst[c]) * (1.0 - alpha);
            dst[c] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Source pixels `[start, start + len)` behind overlay pixels `[lo, hi)`
/// when `target` overlay pixels cover `source` image pixels.
fn source_span(lo: i64, hi: i64, target: u32, source: u32) -> (u32, u32) {
    let scale = f64::from(source) / f64::from(target);
    let start = ((lo as f64 * scale).floor() as u32).min(source - 1);
    let end = ((hi as f64 * scale).ceil() as u32).clamp(start + 1, source);
    (start, end - start)
}

fn add_margin(symbol: RgbaImage, outer: u32, margin: u32, background: Color) -> RgbaImage {
    if margin == 0 {
        return symbol;
    }
    let mut canvas = RgbaImage::from_pixel(outer, outer, background.to_rgba());
    imageops::replace(&mut canvas, &symbol, i64::from(margin), i64::from(margin));
    canvas
}
