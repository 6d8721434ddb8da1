//! Hex colors as typed into a color picker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QrKitError;

/// An RGBA color parsed from `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
///
/// The leading `#` is optional. Serialized back as `#RRGGBB`, with the
/// alpha pair appended only when the color is not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

fn hex_pair(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

impl FromStr for Color {
    type Err = QrKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || QrKitError::Config(format!("invalid color '{}' (expected #RRGGBB)", s));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let parsed = match hex.len() {
            3 => {
                // #abc expands to #aabbcc
                let mut digits = hex.chars().map(|c| hex_pair(&format!("{c}{c}")));
                match (digits.next(), digits.next(), digits.next()) {
                    (Some(Some(r)), Some(Some(g)), Some(Some(b))) => Some(Color::rgb(r, g, b)),
                    _ => None,
                }
            }
            6 | 8 => {
                let r = hex_pair(&hex[0..2]);
                let g = hex_pair(&hex[2..4]);
                let b = hex_pair(&hex[4..6]);
                let a = if hex.len() == 8 { hex_pair(&hex[6..8]) } else { Some(255) };
                match (r, g, b, a) {
                    (Some(r), Some(g), Some(b), Some(a)) => Some(Color { r, g, b, a }),
                    _ => None,
                }
            }
            _ => None,
        };

        parsed.ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = QrKitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("#000000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#FFFFFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(
            "#11223380".parse::<Color>().unwrap(),
            Color { r: 0x11, g: 0x22, b: 0x33, a: 0x80 }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
        assert!("#ééé".parse::<Color>().is_err());
        assert!("#+f0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(255, 128, 0).to_string(), "#FF8000");
        assert_eq!(Color { r: 0, g: 0, b: 0, a: 0 }.to_string(), "#00000000");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(1, 2, 3));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
