/*
 *  display/layout.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen geometry for the header, current and forecast panels
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

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::constants::HEADER_ICON_GAP;
use crate::display::font::{TextFont, CLOCK, LARGE, SMALL};
use crate::display::traits::DisplayCapabilities;

/// Layout configuration for one panel size
///
/// Every panel shares the header row; below it sits either the current
/// conditions block or the forecast columns.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    pub header: HeaderLayout,

    pub current: CurrentLayout,

    pub forecast: ForecastLayout,
}

/// Clock on the left, icons in the gap, title right-aligned.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    pub clock_origin: Point,

    /// ":SS" sits one row lower so its top lines up with the digits.
    pub seconds_origin: Point,

    /// Widest "HH:MM:SS" rendering; icons and title start after it.
    pub clock_width: u32,

    /// Top of the title text
    pub title_y: i32,

    /// Height of the header row
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct CurrentLayout {
    /// Large temperature, top-left of the content area
    pub temperature_origin: Point,

    /// Gap between the temperature and the max/min column
    pub minmax_gap: i32,

    /// Slot 1 under the temperature, slots 2-4 down the right half
    pub slots: [Rectangle; 4],
}

#[derive(Debug, Clone)]
pub struct ForecastLayout {
    /// Horizontal centre of each of the four columns
    pub column_centers: [i32; 4],

    pub time_y: i32,

    pub temperature_y: i32,

    /// High/low/rain line across the bottom
    pub summary_y: i32,
}

impl LayoutConfig {
    pub fn for_display(capabilities: &DisplayCapabilities) -> Self {
        Self::for_size(capabilities.width, capabilities.height)
    }

    pub fn for_size(width: u32, height: u32) -> Self {
        let w = width as i32;
        let clock_width = CLOCK.measure("00:00") + SMALL.measure(":00");
        let content_y = CLOCK.height() as i32 + 7;
        let line = SMALL.height() as i32 + 4;
        let half = (width / 2) as i32;
        let slot_size = Size::new(width / 2 - 4, SMALL.height());
        let bottom = height as i32 - SMALL.height() as i32 - 4;

        Self {
            width,
            height,
            header: HeaderLayout {
                clock_origin: Point::zero(),
                seconds_origin: Point::new(CLOCK.measure("00:00") as i32, 1),
                clock_width,
                title_y: 1,
                height: CLOCK.height(),
            },
            current: CurrentLayout {
                temperature_origin: Point::new(0, content_y),
                minmax_gap: 5,
                slots: [
                    Rectangle::new(Point::new(0, bottom), slot_size),
                    Rectangle::new(Point::new(half + 4, content_y), slot_size),
                    Rectangle::new(Point::new(half + 4, content_y + line), slot_size),
                    Rectangle::new(Point::new(half + 4, bottom), slot_size),
                ],
            },
            forecast: ForecastLayout {
                column_centers: [w / 8, w / 8 + w / 4, w / 8 + w / 2, w / 8 + 3 * w / 4],
                time_y: content_y,
                temperature_y: content_y + line,
                summary_y: bottom + 2,
            },
        }
    }

    /// Font for the large temperature reading.
    pub fn temperature_font(&self) -> TextFont {
        LARGE
    }

    /// Font for slots, title and forecast text.
    pub fn text_font(&self) -> TextFont {
        SMALL
    }

    /// Title area once `reserved` pixels of icons follow the clock.
    pub fn title_box(&self, reserved: u32) -> Rectangle {
        let left = self.header.clock_width as i32 + HEADER_ICON_GAP + reserved as i32;
        let left = left.min(self.width as i32);
        Rectangle::new(
            Point::new(left, self.header.title_y),
            Size::new(self.width - left as u32, SMALL.height()),
        )
    }

    /// Whole frame, used for clipping and placeholders.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.width, self.height))
    }
}
