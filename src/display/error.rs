/*
 *  display/error.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error type for the display subsystem
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

use thiserror::Error;

/// Panel and bus failures. Write failures are recoverable; the next
/// tick simply tries again.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Display initialization failed: {0}")]
    InitializationFailed(String),

    #[error("SPI communication error: {0}")]
    SpiError(String),

    #[error("GPIO error: {0}")]
    GpioError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Operation not supported by this display")]
    UnsupportedOperation,

    #[error("Frame size mismatch: panel is {}x{}, frame is {}x{}", expected.0, expected.1, actual.0, actual.1)]
    FrameSizeMismatch { expected: (u32, u32), actual: (u32, u32) },

    // display_interface::DisplayError is not std::error::Error, so no #[source]
    #[error("Display interface error: {0:?}")]
    InterfaceError(display_interface::DisplayError),
}

impl From<display_interface::DisplayError> for DisplayError {
    fn from(err: display_interface::DisplayError) -> Self {
        DisplayError::InterfaceError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let e = DisplayError::FrameSizeMismatch { expected: (256, 64), actual: (128, 64) };
        assert_eq!(e.to_string(), "Frame size mismatch: panel is 256x64, frame is 128x64");
    }
}
