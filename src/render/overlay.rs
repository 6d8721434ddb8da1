//! # Overlay Geometry
//!
//! Placement math for a logo drawn on top of the QR symbol.
//!
//! ## Placement Modes
//!
//! ```text
//! Centered                          Offset { x, y }
//! ┌──────────────────┐              ┌──────────────────┐
//! │                  │              │ (x,y)            │
//! │      ┌────┐      │              │   ┌────┐         │
//! │      │ ·  │      │              │   │    │         │
//! │      └────┘      │              │   └────┘         │
//! │                  │              │                  │
//! └──────────────────┘              └──────────────────┘
//! left/top 50%, translate(-50%)     left = x, top = y
//! ```
//!
//! Centered pins the image center to the symbol center for any image size.
//! Offsets are taken verbatim: the form's sliders keep them inside
//! [`OverlayImage::offset_bounds`] (see [`OverlayImage::clamp_offset`]), but
//! [`OverlayGeometry::compute`] never clamps, so out-of-range offsets push
//! the overlay past the symbol edge.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Width and height slider range in pixels.
pub const DIMENSION_RANGE: RangeInclusive<u32> = 10..=100;

/// Where the overlay sits on the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Centered,
    /// Top-left corner in symbol pixels.
    Offset { x: i32, y: i32 },
}

/// A logo to draw on top of the QR code, plus its slider settings.
///
/// `src` holds the uploaded image as a `data:` URI and is empty until an
/// upload completes. The settings survive while no image is loaded, like
/// the form's sliders do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayImage {
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    pub placement: Placement,
}

impl Default for OverlayImage {
    fn default() -> Self {
        Self {
            src: String::new(),
            width: 50,
            height: 50,
            opacity: 1.0,
            placement: Placement::Centered,
        }
    }
}

impl OverlayImage {
    /// Whether an image has been loaded.
    pub fn has_image(&self) -> bool {
        !self.src.is_empty()
    }

    /// Largest `(x, y)` offsets that keep the overlay inside a symbol of
    /// `size` pixels. Both are zero when the overlay is larger than the
    /// symbol.
    pub fn offset_bounds(&self, size: u32) -> (u32, u32) {
        (size.saturating_sub(self.width), size.saturating_sub(self.height))
    }

    /// Pull width, height and opacity back into the form's slider ranges.
    /// Offsets are left alone.
    pub fn clamp_to_form_ranges(&mut self) {
        self.width = self.width.clamp(*DIMENSION_RANGE.start(), *DIMENSION_RANGE.end());
        self.height = self.height.clamp(*DIMENSION_RANGE.start(), *DIMENSION_RANGE.end());
        self.opacity = if self.opacity.is_nan() { 1.0 } else { self.opacity.clamp(0.0, 1.0) };
    }

    /// Pull an explicit offset back inside [`Self::offset_bounds`] for a
    /// symbol of `size` pixels, the way the position sliders would.
    pub fn clamp_offset(&mut self, size: u32) {
        let Placement::Offset { x, y } = self.placement else {
            return;
        };
        let (max_x, max_y) = self.offset_bounds(size);
        let limit = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        let clamped = Placement::Offset {
            x: x.clamp(0, limit(max_x)),
            y: y.clamp(0, limit(max_y)),
        };
        if clamped != self.placement {
            tracing::warn!(x, y, ?clamped, size, "overlay offset outside the symbol, clamping");
            self.placement = clamped;
        }
    }

    /// Compute the overlay's geometry on a symbol of `size` pixels.
    pub fn geometry(&self, size: u32) -> OverlayGeometry {
        OverlayGeometry::compute(size, self.width, self.height, self.opacity, self.placement)
    }
}

/// A pixel rectangle, possibly partially or entirely outside the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> i64 {
        self.left + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        self.top + i64::from(self.height)
    }

    /// Whether any part of the rectangle overlaps `[0, size)²`.
    pub fn intersects_square(&self, size: u32) -> bool {
        let size = i64::from(size);
        self.width > 0
            && self.height > 0
            && self.right() > 0
            && self.bottom() > 0
            && self.left < size
            && self.top < size
    }
}

/// Final placement and opacity of an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    /// Left edge in symbol pixels. Half-pixel values occur when a centered
    /// image and the symbol differ in parity.
    pub left: f64,
    pub top: f64,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub centered: bool,
}

impl OverlayGeometry {
    /// Place a `width`×`height` image on a `size`×`size` symbol.
    pub fn compute(size: u32, width: u32, height: u32, opacity: f32, placement: Placement) -> Self {
        let (left, top, centered) = match placement {
            Placement::Centered => {
                let half = f64::from(size) / 2.0;
                (half - f64::from(width) / 2.0, half - f64::from(height) / 2.0, true)
            }
            Placement::Offset { x, y } => (f64::from(x), f64::from(y), false),
        };

        Self {
            left,
            top,
            width,
            height,
            opacity,
            centered,
        }
    }

    /// Center point of the overlay in symbol pixels.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left + f64::from(self.width) / 2.0,
            self.top + f64::from(self.height) / 2.0,
        )
    }

    /// Whole-pixel rectangle used for excavation and blending.
    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            left: self.left.floor() as i64,
            top: self.top.floor() as i64,
            width: self.width,
            height: self.height,
        }
    }

    /// Inline style for positioning the overlay inside a relatively
    /// positioned container of the symbol's size.
    pub fn css(&self) -> String {
        let position = if self.centered {
            "left:50%;top:50%;transform:translate(-50%, -50%)".to_string()
        } else {
            format!("left:{}px;top:{}px", self.left, self.top)
        };
        format!(
            "position:absolute;width:{}px;height:{}px;opacity:{};{}",
            self.width, self.height, self.opacity, position
        )
    }
}
