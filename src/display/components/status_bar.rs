/*
 *  display/components/status_bar.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Header indicators between the clock and the title
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

use embedded_graphics::image::Image;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::constants::HEADER_ICON_GAP;
use crate::display::layout::LayoutConfig;
use crate::glyphs::{stale_marker, umbrella, GLYPH_STALE_SIZE, GLYPH_UMBRELLA_SIZE};

/// Which indicators the header shows this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBarState {
    /// Rain likely in the next 12 hours and the icon is enabled
    pub rain: bool,

    /// Data older than one refresh interval, or last refresh failed
    pub stale: bool,
}

/// Status bar component
pub struct StatusBar {
    layout: LayoutConfig,
}

impl StatusBar {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Header pixels taken by the indicators, gaps included.
    pub fn reserved_width(&self, state: &StatusBarState) -> u32 {
        let mut w = 0;
        if state.stale {
            w += GLYPH_STALE_SIZE + HEADER_ICON_GAP as u32;
        }
        if state.rain {
            w += GLYPH_UMBRELLA_SIZE + HEADER_ICON_GAP as u32;
        }
        w
    }

    /// Render the status bar
    pub fn render<D>(&self, state: &StatusBarState, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let header_h = self.layout.header.height as i32;
        let mut x = self.layout.header.clock_width as i32 + HEADER_ICON_GAP;

        if state.stale {
            let raw = stale_marker();
            let y = (header_h - GLYPH_STALE_SIZE as i32) / 2;
            Image::new(&raw, Point::new(x, y)).draw(target)?;
            x += GLYPH_STALE_SIZE as i32 + HEADER_ICON_GAP;
        }
        if state.rain {
            let raw = umbrella();
            let y = ((header_h - GLYPH_UMBRELLA_SIZE as i32) / 2).max(0);
            Image::new(&raw, Point::new(x, y)).draw(target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::FrameBuffer;

    #[test]
    fn test_nothing_drawn_when_clear() {
        let bar = StatusBar::new(LayoutConfig::for_size(256, 64));
        let mut frame = FrameBuffer::new(256, 64);
        let state = StatusBarState::default();
        bar.render(&state, &mut frame).unwrap();
        assert_eq!(frame.lit_pixels(), 0);
        assert_eq!(bar.reserved_width(&state), 0);
    }

    #[test]
    fn test_icons_stay_in_reserved_span() {
        let layout = LayoutConfig::for_size(256, 64);
        let bar = StatusBar::new(layout.clone());
        let mut frame = FrameBuffer::new(256, 64);
        let state = StatusBarState { rain: true, stale: true };
        bar.render(&state, &mut frame).unwrap();

        let start = layout.header.clock_width + HEADER_ICON_GAP as u32;
        let end = start + bar.reserved_width(&state);
        assert!(frame.lit_pixels() > 0);
        assert_eq!(frame.lit_pixels_in_columns(0, start), 0);
        assert_eq!(frame.lit_pixels_in_columns(end, 256), 0);
        assert_eq!(layout.title_box(bar.reserved_width(&state)).top_left.x as u32, end);
    }
}
