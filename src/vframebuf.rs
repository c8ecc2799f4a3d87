/*
 *  vframebuf.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Runtime sized pixel buffer usable as an embedded-graphics target
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
use core::convert::Infallible;
use core::ops::Range;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

impl<C: PixelColor + Clone> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access, row major
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    pub fn get(&self, x: i32, y: i32) -> Option<C> {
        self.idx(Point::new(x, y)).map(|i| self.buf[i])
    }

    pub fn set(&mut self, x: i32, y: i32, color: C) {
        if let Some(i) = self.idx(Point::new(x, y)) {
            self.buf[i] = color;
        }
    }

    /// Half turn in place; a row-major buffer reversed is the same image upside down.
    pub fn rotate_180(&mut self) {
        self.buf.reverse();
    }

    /// Overwrite columns `cols` of every row with the same columns of `src`.
    /// Sizes must match; columns outside the buffer are ignored.
    pub fn copy_columns_from(&mut self, src: &VarFrameBuf<C>, cols: Range<usize>) {
        if src.w != self.w || src.h != self.h {
            return;
        }
        let start = cols.start.min(self.w);
        let end = cols.end.min(self.w);
        if start >= end {
            return;
        }
        for row in 0..self.h {
            let base = row * self.w;
            self.buf[base + start..base + end].copy_from_slice(&src.buf[base + start..base + end]);
        }
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor + Clone> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // text scrolled past the left edge arrives with negative x, so clip per point
        for (p, c) in area.points().zip(colors) {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;

    #[test]
    fn clipped_fill_does_not_wrap_rows() {
        let mut fb = VarFrameBuf::new(8, 2, BinaryColor::Off);
        let area = Rectangle::new(Point::new(-2, 0), Size::new(4, 1));
        fb.fill_contiguous(&area, core::iter::repeat(BinaryColor::On)).unwrap();
        assert_eq!(fb.get(0, 0), Some(BinaryColor::On));
        assert_eq!(fb.get(1, 0), Some(BinaryColor::On));
        assert_eq!(fb.get(2, 0), Some(BinaryColor::Off));
        assert_eq!(fb.get(6, 0), Some(BinaryColor::Off));
        assert_eq!(fb.get(7, 0), Some(BinaryColor::Off));
    }

    #[test]
    fn half_turn() {
        let mut fb = VarFrameBuf::new(4, 3, BinaryColor::Off);
        fb.set(0, 0, BinaryColor::On);
        fb.set(1, 2, BinaryColor::On);
        fb.rotate_180();
        assert_eq!(fb.get(3, 2), Some(BinaryColor::On));
        assert_eq!(fb.get(2, 0), Some(BinaryColor::On));
        assert_eq!(fb.as_slice().iter().filter(|c| c.is_on()).count(), 2);
    }

    #[test]
    fn column_copy() {
        let mut dst = VarFrameBuf::new(4, 2, BinaryColor::Off);
        let src = VarFrameBuf::new(4, 2, BinaryColor::On);
        dst.copy_columns_from(&src, 2..10);
        assert_eq!(dst.get(1, 1), Some(BinaryColor::Off));
        assert_eq!(dst.get(2, 1), Some(BinaryColor::On));
        assert_eq!(dst.get(3, 0), Some(BinaryColor::On));
    }
}
