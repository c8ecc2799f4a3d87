/*
 *  display/framebuffer.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Monochrome frame and its packed forms for the panel controllers
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

use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use crate::vframebuf::VarFrameBuf;

/// Gray level written for a lit pixel on 4-bit controllers.
pub const GRAY4_ON: u8 = 0x0F;

/// One complete monochrome frame, top-left origin, row major.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    fb: VarFrameBuf<BinaryColor>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { fb: VarFrameBuf::new(width, height, BinaryColor::Off) }
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.fb.width() as u32, self.fb.height() as u32)
    }

    pub fn width(&self) -> u32 {
        self.fb.width() as u32
    }

    pub fn clear(&mut self) {
        self.fb.clear_color(BinaryColor::Off);
    }

    pub fn is_on(&self, x: i32, y: i32) -> bool {
        self.fb.get(x, y).is_some_and(|c| c.is_on())
    }

    pub fn lit_pixels(&self) -> usize {
        self.fb.as_slice().iter().filter(|c| c.is_on()).count()
    }

    /// Lit pixels in columns `x0..x1`.
    pub fn lit_pixels_in_columns(&self, x0: u32, x1: u32) -> usize {
        let w = self.fb.width();
        self.fb
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(i, c)| {
                let x = (i % w) as u32;
                x >= x0 && x < x1 && c.is_on()
            })
            .count()
    }

    pub fn rotate_180(&mut self) {
        self.fb.rotate_180();
    }

    /// Replace columns from `boundary` rightwards with `outgoing`.
    pub fn blend_wipe(&mut self, outgoing: &FrameBuffer, boundary: u32) {
        self.fb
            .copy_columns_from(&outgoing.fb, boundary as usize..self.fb.width());
    }

    /// 8 pixels per byte, LSB first, row major.
    pub fn to_mono_bytes(&self) -> Vec<u8> {
        let pixels = self.fb.as_slice();
        let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
        for (i, pixel) in pixels.iter().enumerate() {
            if pixel.is_on() {
                bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bytes
    }

    /// 2 pixels per byte, high nibble first, as the SSD1322 expects.
    pub fn to_gray4_bytes(&self) -> Vec<u8> {
        let pixels = self.fb.as_slice();
        let mut bytes = vec![0u8; pixels.len().div_ceil(2)];
        for (i, pixel) in pixels.iter().enumerate() {
            if pixel.is_on() {
                bytes[i / 2] |= if i % 2 == 0 { GRAY4_ON << 4 } else { GRAY4_ON };
            }
        }
        bytes
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.fb.size()
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.fb.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.fb.fill_contiguous(area, colors)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fb.clear_color(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn packing() {
        let mut f = FrameBuffer::new(4, 2);
        Pixel(Point::new(0, 0), BinaryColor::On).draw(&mut f).unwrap();
        Pixel(Point::new(3, 1), BinaryColor::On).draw(&mut f).unwrap();
        assert_eq!(f.to_mono_bytes(), vec![0b1000_0001]);
        assert_eq!(f.to_gray4_bytes(), vec![0xF0, 0x00, 0x00, 0x0F]);
    }

    #[test]
    fn wipe_keeps_incoming_left_of_boundary() {
        let mut incoming = FrameBuffer::new(10, 2);
        let mut outgoing = FrameBuffer::new(10, 2);
        Rectangle::new(Point::zero(), Size::new(10, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut outgoing)
            .unwrap();
        incoming.blend_wipe(&outgoing, 6);
        assert_eq!(incoming.lit_pixels_in_columns(0, 6), 0);
        assert_eq!(incoming.lit_pixels_in_columns(6, 10), 8);
        // boundary at the far edge leaves the incoming frame alone
        let mut full = FrameBuffer::new(10, 2);
        full.blend_wipe(&outgoing, 10);
        assert_eq!(full.lit_pixels(), 0);
    }
}
