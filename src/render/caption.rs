//! Title caption above the symbol.
//!
//! Text is drawn with the Spleen 12×24 bitmap font in the foreground color
//! and centered over the symbol.

use image::RgbaImage;
use image::imageops;
use spleen_font::{FONT_12X24, PSF2Font};

use super::config::RenderConfig;
use crate::error::{QrKitError, Result};

const GLYPH_WIDTH: u32 = 12;
const GLYPH_HEIGHT: u32 = 24;
/// Space around the caption and between caption and symbol.
const CAPTION_PAD: u32 = 8;

/// Put the configured title above a rendered symbol.
///
/// Returns the symbol unchanged when the title is blank.
pub fn compose_card(symbol: &RgbaImage, config: &RenderConfig) -> Result<RgbaImage> {
    let title = config.title.trim();
    if title.is_empty() {
        return Ok(symbol.clone());
    }

    let mut font = PSF2Font::new(FONT_12X24)
        .map_err(|_| QrKitError::Image("failed to load caption font".to_string()))?;

    let text_width = title.chars().count() as u32 * GLYPH_WIDTH;
    let width = symbol.width().max(text_width + 2 * CAPTION_PAD);
    let header = CAPTION_PAD + GLYPH_HEIGHT + CAPTION_PAD;
    let mut card = RgbaImage::from_pixel(width, header + symbol.height(), config.background.to_rgba());

    let ink = config.foreground.to_rgba();
    let mut cursor_x = (width - text_width) / 2;
    for ch in title.chars() {
        let utf8 = ch.to_string();
        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    let x = cursor_x + col_x as u32;
                    let y = CAPTION_PAD + row_y as u32;
                    if on && x < width && y < header {
                        card.put_pixel(x, y, ink);
                    }
                }
            }
        }
        cursor_x += GLYPH_WIDTH;
    }

    let symbol_x = (width - symbol.width()) / 2;
    imageops::replace(&mut card, symbol, i64::from(symbol_x), i64::from(header));
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::Color;

    fn symbol(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Color::rgb(1, 2, 3).to_rgba())
    }

    #[test]
    fn test_blank_title_is_passthrough() {
        let config = RenderConfig {
            title: "   ".to_string(),
            ..Default::default()
        };
        let sym = symbol(50);
        assert_eq!(compose_card(&sym, &config).unwrap(), sym);
    }

    #[test]
    fn test_title_adds_header() {
        let config = RenderConfig {
            title: "Menu".to_string(),
            ..Default::default()
        };
        let card = compose_card(&symbol(208), &config).unwrap();
        assert_eq!(card.dimensions(), (208, 208 + 40));

        // Symbol sits below the header.
        assert_eq!(*card.get_pixel(0, 40), Color::rgb(1, 2, 3).to_rgba());
        // Some caption pixels are inked.
        let inked = (0..40)
            .flat_map(|y| (0..208).map(move |x| (x, y)))
            .filter(|&(x, y)| *card.get_pixel(x, y) == Color::BLACK.to_rgba())
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_long_title_widens_card() {
        let config = RenderConfig {
            title: "A much longer caption than the code".to_string(),
            ..Default::default()
        };
        let card = compose_card(&symbol(100), &config).unwrap();
        assert_eq!(card.width(), 35 * 12 + 16);
        // Symbol is centered horizontally.
        let left = (card.width() - 100) / 2;
        assert_eq!(*card.get_pixel(left, 40), Color::rgb(1, 2, 3).to_rgba());
        assert_eq!(*card.get_pixel(left - 1, 40), Color::WHITE.to_rgba());
    }
}
