/*
 *  display/font.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mono fonts with measurement matching what gets drawn
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_5X8, FONT_6X10, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

/// A mono font. Glyphs outside ISO 8859-1 draw as the font's
/// replacement glyph and still measure one cell wide.
#[derive(Clone, Copy)]
pub struct TextFont {
    font: &'static MonoFont<'static>,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TextFont({}x{})", self.font.character_size.width, self.font.character_size.height)
    }
}

impl PartialEq for TextFont {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.font, other.font)
    }
}

impl TextFont {
    pub const fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    pub fn char_width(&self) -> u32 {
        self.font.character_size.width
    }

    pub fn height(&self) -> u32 {
        self.font.character_size.height
    }

    /// Rendered width in pixels.
    pub fn measure(&self, text: &str) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 {
            return 0;
        }
        n * (self.font.character_size.width + self.font.character_spacing)
            - self.font.character_spacing
    }

    /// Draw with `top_left` as the top-left corner of the first cell.
    pub fn draw<D>(&self, text: &str, top_left: Point, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        Text::with_baseline(text, top_left, style, Baseline::Top).draw(target)?;
        Ok(())
    }
}

pub const TINY: TextFont = TextFont::new(&FONT_5X8);
pub const SMALL: TextFont = TextFont::new(&FONT_6X10);
pub const CLOCK: TextFont = TextFont::new(&FONT_9X15_BOLD);
pub const LARGE: TextFont = TextFont::new(&FONT_10X20);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::FrameBuffer;

    #[test]
    fn measure_counts_chars_not_bytes() {
        assert_eq!(SMALL.measure(""), 0);
        assert_eq!(SMALL.measure("Humidity: 81%"), 13 * 6);
        assert_eq!(SMALL.measure("°C"), 12);
        assert_eq!(LARGE.measure("12°C"), 40);
    }

    #[test]
    fn drawing_stays_inside_measured_box() {
        let mut frame = FrameBuffer::new(64, 16);
        let text = "Wind 4.1";
        SMALL.draw(text, Point::new(2, 3), &mut frame).unwrap();
        let w = SMALL.measure(text);
        assert!(frame.lit_pixels() > 0);
        assert_eq!(frame.lit_pixels_in_columns(0, 2), 0);
        assert_eq!(frame.lit_pixels_in_columns(2 + w, 64), 0);
    }

    #[test]
    fn unmapped_glyph_still_draws() {
        let mut frame = FrameBuffer::new(16, 16);
        SMALL.draw("\u{2603}", Point::zero(), &mut frame).unwrap();
        assert_eq!(SMALL.measure("\u{2603}"), 6);
        assert!(frame.lit_pixels() > 0);
    }
}
