/*
 *  display/traits.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for display driver abstraction
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

use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;

/// How the controller stores pixels in its RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// 1-bit per pixel
    Monochrome,

    /// 4-bit grayscale (16 levels), used by the SSD1322
    Gray4,
}

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,

    /// Controller RAM format
    pub color_depth: ColorDepth,

    /// Maximum recommended frame rate
    pub max_fps: u32,

    /// Whether the display supports brightness control
    pub supports_brightness: bool,
}

/// Minimal hardware abstraction - all display drivers must implement this trait
///
/// The render path composes a complete [`FrameBuffer`] every tick and hands
/// it over whole; drivers convert it to their RAM format.
pub trait DisplayDriver: Send {
    /// Returns the capabilities of this display
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Reset and configure the controller, leaving the panel on and blank
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Push a complete frame to the panel
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError>;

    /// Clear the display to blank/off state
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Panel power (sleep) without losing controller state
    fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Set display brightness (0-255)
    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        let _ = value;
        Err(DisplayError::UnsupportedOperation)
    }
}
