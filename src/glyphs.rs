/*
 *  glyphs.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use embedded_graphics::image::ImageRaw;
use embedded_graphics::pixelcolor::BinaryColor;

/// Umbrella shown in the header when rain is likely, 16x16 MSB first.
pub const GLYPH_UMBRELLA: [u8; 32] = [
    0x01, 0x80, 0x07, 0xe0, 0x1f, 0xf8, 0x3f, 0xfc,
    0x7f, 0xfe, 0x7f, 0xfe, 0xff, 0xff, 0x89, 0x91,
    0x01, 0x80, 0x01, 0x80, 0x01, 0x80, 0x01, 0x80,
    0x01, 0x80, 0x01, 0x98, 0x01, 0xf8, 0x00, 0xf0,
];
pub const GLYPH_UMBRELLA_SIZE: u32 = 16;

/// Hourglass marking data whose last refresh failed or is overdue, 8x8.
pub const GLYPH_STALE: [u8; 8] = [0xff, 0x81, 0x42, 0x24, 0x24, 0x42, 0x81, 0xff,];
pub const GLYPH_STALE_SIZE: u32 = 8;

pub fn umbrella() -> ImageRaw<'static, BinaryColor> {
    ImageRaw::new(&GLYPH_UMBRELLA, GLYPH_UMBRELLA_SIZE)
}

pub fn stale_marker() -> ImageRaw<'static, BinaryColor> {
    ImageRaw::new(&GLYPH_STALE, GLYPH_STALE_SIZE)
}
