/*
 *  display/factory.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Picks the panel driver for this run
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

use crate::config::Config;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::drivers::mock::MockDriver;
use crate::display::error::DisplayError;
use crate::display::traits::DisplayDriver;
use log::info;

#[cfg(feature = "driver-ssd1322")]
use crate::display::drivers::ssd1322::Ssd1322Driver;

/// Type alias for boxed display driver trait objects
pub type BoxedDriver = Box<dyn DisplayDriver>;

/// Factory for creating display drivers from configuration
pub struct DisplayDriverFactory;

impl DisplayDriverFactory {
    /// The SSD1322 on the configured spidev, or the in-memory driver when emulated.
    pub fn create(config: &Config, emulated: bool) -> Result<BoxedDriver, DisplayError> {
        if emulated {
            info!("Emulation mode enabled - rendering to memory ({}x{})",
                DISPLAY_WIDTH, DISPLAY_HEIGHT);
            return Ok(Box::new(MockDriver::new_with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)));
        }
        Self::create_hardware(config)
    }

    #[cfg(feature = "driver-ssd1322")]
    fn create_hardware(config: &Config) -> Result<BoxedDriver, DisplayError> {
        Ok(Box::new(Ssd1322Driver::new_spi(
            &config.spi_device,
            config.dc_pin,
            config.rst_pin,
        )?))
    }

    #[cfg(not(feature = "driver-ssd1322"))]
    fn create_hardware(_config: &Config) -> Result<BoxedDriver, DisplayError> {
        Err(DisplayError::InvalidConfiguration(
            "SSD1322 driver not enabled. Enable with --features driver-ssd1322 or run --emulated".to_string()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emulated_is_panel_sized() {
        let driver = DisplayDriverFactory::create(&Config::default(), true).unwrap();
        assert_eq!(driver.dimensions(), (DISPLAY_WIDTH, DISPLAY_HEIGHT));
    }
}
