//! # Render Configuration
//!
//! The appearance half of the form: colors, size, margin, error-correction
//! level and title.
//!
//! ## Defaults and Ranges
//!
//! | Setting | Default | Form range |
//! |---------|---------|------------|
//! | foreground | `#000000` | any color |
//! | background | `#FFFFFF` | any color |
//! | size | 200 px | 100-400, step 10 |
//! | margin | 4 px | 0-10 |
//! | error level | M | L, M, Q, H |
//! | title | empty | any text |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::color::Color;
use crate::error::QrKitError;

/// Size slider range in pixels.
pub const SIZE_RANGE: RangeInclusive<u32> = 100..=400;

/// Margin slider range in pixels.
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=10;

/// QR error correction level.
///
/// Higher levels survive more damage (or a bigger logo on top) at the cost
/// of capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// Level L: ~7% error recovery
    L,
    /// Level M: ~15% error recovery (default)
    #[default]
    M,
    /// Level Q: ~25% error recovery
    Q,
    /// Level H: ~30% error recovery
    H,
}

impl ErrorCorrection {
    pub const ALL: [ErrorCorrection; 4] = [
        ErrorCorrection::L,
        ErrorCorrection::M,
        ErrorCorrection::Q,
        ErrorCorrection::H,
    ];

    pub(crate) fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ErrorCorrection {
    type Err = QrKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::L),
            "M" => Ok(ErrorCorrection::M),
            "Q" => Ok(ErrorCorrection::Q),
            "H" => Ok(ErrorCorrection::H),
            _ => Err(QrKitError::Config(format!(
                "invalid error correction level '{}' (expected L, M, Q or H)",
                s
            ))),
        }
    }
}

/// Rendering parameters for one QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub foreground: Color,
    pub background: Color,
    /// Edge length of the symbol in pixels, quiet zone included.
    pub size: u32,
    pub error_level: ErrorCorrection,
    /// Extra background border around the symbol, in pixels.
    pub margin: u32,
    /// Caption shown above the symbol. Empty means no caption.
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            size: 200,
            error_level: ErrorCorrection::M,
            margin: 4,
            title: String::new(),
        }
    }
}

impl RenderConfig {
    /// Pull size and margin back into the form's slider ranges.
    ///
    /// Values from a slider are always in range; this is for values typed on
    /// the command line or read from a form file.
    pub fn clamp_to_form_ranges(&mut self) {
        let size = self.size.clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
        let margin = self.margin.clamp(*MARGIN_RANGE.start(), *MARGIN_RANGE.end());
        if size != self.size || margin != self.margin {
            tracing::warn!(
                size = self.size,
                margin = self.margin,
                clamped_size = size,
                clamped_margin = margin,
                "render settings outside form ranges, clamping"
            );
        }
        self.size = size;
        self.margin = margin;
    }

    /// Full edge length of the rendered image, margin included.
    pub fn outer_size(&self) -> Result<u32, QrKitError> {
        outer_edge(self.size, self.margin)
    }
}

/// `size + 2 * margin`, or a config error when that does not fit in a `u32`.
pub(crate) fn outer_edge(size: u32, margin: u32) -> Result<u32, QrKitError> {
    margin
        .checked_mul(2)
        .and_then(|border| size.checked_add(border))
        .ok_or_else(|| {
            QrKitError::Config(format!("size {} with margin {} is too large", size, margin))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let config = RenderConfig::default();
        assert_eq!(config.foreground.to_string(), "#000000");
        assert_eq!(config.background.to_string(), "#FFFFFF");
        assert_eq!(config.size, 200);
        assert_eq!(config.margin, 4);
        assert_eq!(config.error_level, ErrorCorrection::M);
        assert!(config.title.is_empty());
        assert_eq!(config.outer_size().unwrap(), 208);
    }

    #[test]
    fn test_error_level_parse() {
        for level in ErrorCorrection::ALL {
            assert_eq!(level.to_string().parse::<ErrorCorrection>().unwrap(), level);
        }
        assert_eq!("h".parse::<ErrorCorrection>().unwrap(), ErrorCorrection::H);
        assert!("X".parse::<ErrorCorrection>().is_err());
    }

    #[test]
    fn test_clamp_to_form_ranges() {
        let mut config = RenderConfig {
            size: 1000,
            margin: 50,
            ..Default::default()
        };
        config.clamp_to_form_ranges();
        assert_eq!(config.size, 400);
        assert_eq!(config.margin, 10);

        let mut config = RenderConfig {
            size: 20,
            ..Default::default()
        };
        config.clamp_to_form_ranges();
        assert_eq!(config.size, 100);
    }

    #[test]
    fn test_outer_size_overflow_is_config_error() {
        let config = RenderConfig {
            margin: u32::MAX / 2 + 1,
            ..Default::default()
        };
        assert!(matches!(config.outer_size(), Err(QrKitError::Config(_))));

        let config = RenderConfig {
            size: u32::MAX,
            margin: 1,
            ..Default::default()
        };
        assert!(config.outer_size().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r##"{"foreground": "#336699", "error_level": "H"}"##).unwrap();
        assert_eq!(config.foreground, Color::rgb(0x33, 0x66, 0x99));
        assert_eq!(config.error_level, ErrorCorrection::H);
        assert_eq!(config.size, 200);
    }
}
