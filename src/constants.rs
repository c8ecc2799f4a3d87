/*
 *  constants.rs
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

/// The width of the SSD1322 panel in pixels.
pub const DISPLAY_WIDTH: u32 = 256;
/// The height of the SSD1322 panel in pixels.
pub const DISPLAY_HEIGHT: u32 = 64;

/// Forecast rain probability (0.0-1.0) at which the umbrella is shown.
pub const RAIN_ICON_THRESHOLD: f64 = 0.5;

/// Marquee speed; the per-tick step is derived from this and the fps.
pub const SCROLL_PIXELS_PER_SECOND: u32 = 40;

/// Blink transition toggles visibility at this period.
pub const BLINK_INTERVAL_MS: u64 = 50;

/// Tick period used while outside operating hours.
pub const INACTIVE_POLL_MS: u64 = 1000;

/// spidev default bufsiz, frames are pushed in chunks of this size.
pub const SPI_CHUNK_BYTES: usize = 4096;

/// Forecast list entries (3h steps) shown as columns: now, +6h, +12h, +21h.
pub const FORECAST_COLUMN_INDICES: [usize; 4] = [0, 2, 4, 7];
/// 3h forecast entries covering the next 12 hours.
pub const FORECAST_RAIN_WINDOW: usize = 4;
/// 3h forecast entries covering the next 24 hours.
pub const FORECAST_DAY_WINDOW: usize = 8;

/// Horizontal gap between the clock and the header icons.
pub const HEADER_ICON_GAP: i32 = 4;
