/*
 *  display/components/clock.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Header clock and the date that fits beside it
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

use arrayvec::ArrayString;
use chrono::{DateTime, TimeZone, Timelike};
use core::fmt::Write;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::deutils::date_candidates;
use crate::display::font::{TextFont, CLOCK, SMALL};
use crate::display::layout::LayoutConfig;

/// Clock strings for one second, stack allocated since they are built every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockText {
    /// "HH:MM"
    pub hours_minutes: ArrayString<8>,
    /// ":SS"
    pub seconds: ArrayString<4>,
}

impl ClockText {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let mut hours_minutes = ArrayString::new();
        let mut seconds = ArrayString::new();
        let _ = write!(&mut hours_minutes, "{:02}:{:02}", now.hour(), now.minute());
        let _ = write!(&mut seconds, ":{:02}", now.second());
        Self { hours_minutes, seconds }
    }
}

/// Longest date rendering no wider than `available`; the shortest
/// one when none fits.
pub fn fit_date<Tz: TimeZone>(now: &DateTime<Tz>, available: u32, font: &TextFont) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let [full, no_year, short] = date_candidates(now);
    [full, no_year]
        .into_iter()
        .find(|c| font.measure(c) <= available)
        .unwrap_or(short)
}

/// Clock display component
pub struct ClockDisplay {
    layout: LayoutConfig,
}

impl ClockDisplay {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Render the clock display
    pub fn render<D>(&self, text: &ClockText, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        CLOCK.draw(&text.hours_minutes, self.layout.header.clock_origin, target)?;
        SMALL.draw(&text.seconds, self.layout.header.seconds_origin, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::FrameBuffer;
    use chrono::{Local, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, mi, s))
            .and_then(|n| Local.from_local_datetime(&n).earliest())
            .unwrap()
    }

    #[test]
    fn test_clock_text() {
        let t = ClockText::at(&at(2024, 6, 1, 8, 5, 9));
        assert_eq!(t.hours_minutes.as_str(), "08:05");
        assert_eq!(t.seconds.as_str(), ":09");
    }

    #[test]
    fn test_fit_date_prefers_longest() {
        // Wednesday 18th September 2024
        let now = at(2024, 9, 18, 12, 0, 0);
        let [full, no_year, short] = date_candidates(&now);
        assert_eq!(fit_date(&now, 256, &SMALL), full);
        assert_eq!(fit_date(&now, SMALL.measure(&no_year), &SMALL), no_year);
        assert_eq!(fit_date(&now, 10, &SMALL), short);
    }

    #[test]
    fn test_clock_renders_inside_header() {
        let layout = LayoutConfig::for_size(256, 64);
        let clock = ClockDisplay::new(layout.clone());
        let mut frame = FrameBuffer::new(256, 64);
        clock.render(&ClockText::at(&at(2024, 6, 1, 23, 59, 59)), &mut frame).unwrap();
        assert!(frame.lit_pixels() > 0);
        assert_eq!(frame.lit_pixels_in_columns(layout.header.clock_width, 256), 0);
    }
}
