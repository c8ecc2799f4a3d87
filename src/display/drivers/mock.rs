/*
 *  display/drivers/mock.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory display driver for tests and --emulated runs
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
use crate::display::traits::{DisplayDriver, DisplayCapabilities, ColorDepth};

use std::sync::{Arc, Mutex, MutexGuard};

/// Mock display driver
///
/// Keeps the last frame written and counts every operation. The counters
/// live behind an `Arc<Mutex<_>>` so a test can keep a handle after the
/// driver has been boxed and handed to the manager.
#[derive(Debug, Clone)]
pub struct MockDriver {
    capabilities: DisplayCapabilities,
    state: Arc<Mutex<MockDriverState>>,
}

/// Internal state for the mock driver (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Successful write_frame() calls
    pub frames_written: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Last brightness value set
    pub last_brightness: Option<u8>,

    /// Panel power as last set
    pub display_on: bool,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Copy of the most recent frame
    pub last_frame: Option<FrameBuffer>,

    /// Simulate failures (for error testing)
    pub simulate_write_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriver {
    pub fn new_with_size(width: u32, height: u32) -> Self {
        let capabilities = DisplayCapabilities {
            width,
            height,
            color_depth: ColorDepth::Monochrome,
            max_fps: 60,
            supports_brightness: true,
        };

        Self {
            capabilities,
            state: Arc::new(Mutex::new(MockDriverState::default())),
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockDriverState> {
        // a panicking test thread must not hide the counters from the others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lit pixels in the last frame written
    pub fn count_on_pixels(&self) -> usize {
        self.lock().last_frame.as_ref().map_or(0, |f| f.lit_pixels())
    }

    /// Save the last frame to a PBM file (for visual debugging)
    pub fn save_to_pbm(&self, path: &std::path::Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::Write;

        let state = self.lock();
        let Some(frame) = state.last_frame.as_ref() else {
            return Ok(());
        };
        let (w, h) = frame.dimensions();
        let mut file = File::create(path)?;

        writeln!(file, "P1")?;
        writeln!(file, "{} {}", w, h)?;
        for y in 0..h as i32 {
            let row: Vec<&str> = (0..w as i32)
                .map(|x| if frame.is_on(x, y) { "1" } else { "0" })
                .collect();
            writeln!(file, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        state.display_on = true;
        Ok(())
    }

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let expected = (self.capabilities.width, self.capabilities.height);
        if frame.dimensions() != expected {
            return Err(DisplayError::FrameSizeMismatch { expected, actual: frame.dimensions() });
        }

        let mut state = self.lock();
        if state.simulate_write_failure {
            return Err(DisplayError::SpiError("Simulated write failure".to_string()));
        }
        state.frames_written += 1;
        state.last_frame = Some(frame.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock();
        state.clear_count += 1;
        state.last_frame = Some(FrameBuffer::new(self.capabilities.width, self.capabilities.height));
        Ok(())
    }

    fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.lock().display_on = on;
        Ok(())
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.lock().last_brightness = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new_with_size(256, 64);
        assert_eq!(driver.dimensions(), (256, 64));
        assert_eq!(driver.capabilities().color_depth, ColorDepth::Monochrome);
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new_with_size(128, 64);
        let state = driver.state();

        assert!(driver.init().is_ok());
        let s = state.lock().unwrap();
        assert_eq!(s.init_count, 1);
        assert!(s.is_initialized);
        assert!(s.display_on);
    }

    #[test]
    fn test_mock_driver_init_failure() {
        let mut driver = MockDriver::new_with_size(128, 64);
        driver.state().lock().unwrap().simulate_init_failure = true;
        assert!(driver.init().is_err());
    }

    #[test]
    fn test_write_frame_keeps_copy() {
        let mut driver = MockDriver::new_with_size(8, 4);
        let mut frame = FrameBuffer::new(8, 4);
        Pixel(Point::new(1, 1), BinaryColor::On).draw(&mut frame).unwrap();
        driver.write_frame(&frame).unwrap();
        assert_eq!(driver.count_on_pixels(), 1);
        assert_eq!(driver.state().lock().unwrap().frames_written, 1);

        driver.clear().unwrap();
        assert_eq!(driver.count_on_pixels(), 0);
    }

    #[test]
    fn test_write_frame_size_and_failure() {
        let mut driver = MockDriver::new_with_size(8, 4);
        assert!(matches!(
            driver.write_frame(&FrameBuffer::new(4, 4)),
            Err(DisplayError::FrameSizeMismatch { .. })
        ));
        driver.state().lock().unwrap().simulate_write_failure = true;
        assert!(driver.write_frame(&FrameBuffer::new(8, 4)).is_err());
        assert_eq!(driver.state().lock().unwrap().frames_written, 0);
    }

    #[test]
    fn test_save_pbm() {
        let dir = tempfile::tempdir().unwrap();
        let mut driver = MockDriver::new_with_size(3, 2);
        let mut frame = FrameBuffer::new(3, 2);
        Pixel(Point::new(2, 0), BinaryColor::On).draw(&mut frame).unwrap();
        driver.write_frame(&frame).unwrap();
        let path = dir.path().join("frame.pbm");
        driver.save_to_pbm(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "P1\n3 2\n0 0 1\n0 0 0\n");
    }
}
