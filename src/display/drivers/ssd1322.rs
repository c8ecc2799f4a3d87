/*
 *  display/drivers/ssd1322.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  SSD1322 256x64 over Linux spidev with sysfs DC and RST lines
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

use display_interface::{DataFormat, WriteOnlyDataCommand};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{SpidevDevice, SysfsPin};
use log::{debug, info};
use std::thread;
use std::time::Duration;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPI_CHUNK_BYTES};
use crate::display::error::DisplayError;
use crate::display::framebuffer::FrameBuffer;
use crate::display::traits::{DisplayDriver, DisplayCapabilities, ColorDepth};

const SPI_SPEED_HZ: u32 = 10_000_000;

/// The 256 visible columns sit in the middle of the 480 column RAM,
/// addressed in groups of four pixels.
const COLUMN_START: u8 = 0x1C;
const COLUMN_END: u8 = 0x5B;

mod cmd {
    pub const SET_COLUMN: u8 = 0x15;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const SET_ROW: u8 = 0x75;
    pub const REMAP: u8 = 0xA0;
    pub const START_LINE: u8 = 0xA1;
    pub const OFFSET: u8 = 0xA2;
    pub const NORMAL: u8 = 0xA6;
    pub const EXIT_PARTIAL: u8 = 0xA9;
    pub const FUNCTION_SELECT: u8 = 0xAB;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const PHASE_LENGTH: u8 = 0xB1;
    pub const CLOCK_DIVIDER: u8 = 0xB3;
    pub const ENHANCEMENT_A: u8 = 0xB4;
    pub const GPIO: u8 = 0xB5;
    pub const SECOND_PRECHARGE: u8 = 0xB6;
    pub const DEFAULT_GRAYSCALE: u8 = 0xB9;
    pub const PRECHARGE_VOLTAGE: u8 = 0xBB;
    pub const VCOMH: u8 = 0xBE;
    pub const CONTRAST: u8 = 0xC1;
    pub const MASTER_CONTRAST: u8 = 0xC7;
    pub const MUX_RATIO: u8 = 0xCA;
    pub const ENHANCEMENT_B: u8 = 0xD1;
    pub const LOCK: u8 = 0xFD;
}

/// 4-wire SPI: DC low for the command byte, high for its parameters and pixel data.
pub struct SpiInterface {
    spi: SpidevDevice,
    dc: SysfsPin,
}

impl SpiInterface {
    fn write(&mut self, data: DataFormat<'_>) -> Result<(), display_interface::DisplayError> {
        match data {
            DataFormat::U8(bytes) => {
                for chunk in bytes.chunks(SPI_CHUNK_BYTES) {
                    self.spi
                        .write(chunk)
                        .map_err(|_| display_interface::DisplayError::BusWriteError)?;
                }
                Ok(())
            }
            _ => Err(display_interface::DisplayError::DataFormatNotImplemented),
        }
    }
}

impl WriteOnlyDataCommand for SpiInterface {
    fn send_commands(&mut self, cmds: DataFormat<'_>) -> Result<(), display_interface::DisplayError> {
        self.dc.set_low().map_err(|_| display_interface::DisplayError::DCError)?;
        self.write(cmds)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), display_interface::DisplayError> {
        self.dc.set_high().map_err(|_| display_interface::DisplayError::DCError)?;
        self.write(buf)
    }
}

fn output_pin(pin: u32) -> Result<SysfsPin, DisplayError> {
    let gpio = SysfsPin::new(pin as u64);
    gpio.export()
        .map_err(|e| DisplayError::GpioError(format!("export {}: {:?}", pin, e)))?;

    // udev may take a moment to hand over the new sysfs node
    let mut attempts = 0;
    while !gpio.is_exported() {
        thread::sleep(Duration::from_millis(10));
        attempts += 1;
        if attempts > 100 {
            return Err(DisplayError::GpioError(format!("GPIO {} never appeared", pin)));
        }
    }
    gpio.set_direction(Direction::High)
        .map_err(|e| DisplayError::GpioError(format!("direction {}: {:?}", pin, e)))?;
    Ok(gpio)
}

pub struct Ssd1322Driver {
    interface: SpiInterface,
    rst: SysfsPin,
    capabilities: DisplayCapabilities,
}

impl Ssd1322Driver {
    /// Open the SPI device and claim the DC and RST lines (BCM numbering).
    pub fn new_spi(spi_bus_path: &str, dc_pin: u32, rst_pin: u32) -> Result<Self, DisplayError> {
        info!("Opening SSD1322 on {} with DC pin {} and RST pin {}",
              spi_bus_path, dc_pin, rst_pin);

        let mut spi = SpidevDevice::open(spi_bus_path)
            .map_err(|e| DisplayError::SpiError(format!("open {}: {:?}", spi_bus_path, e)))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options)
            .map_err(|e| DisplayError::SpiError(format!("configure: {:?}", e)))?;

        let dc = output_pin(dc_pin)?;
        let rst = output_pin(rst_pin)?;

        let capabilities = DisplayCapabilities {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            color_depth: ColorDepth::Gray4,
            max_fps: 60,
            supports_brightness: true,
        };

        Ok(Self {
            interface: SpiInterface { spi, dc },
            rst,
            capabilities,
        })
    }

    fn command(&mut self, op: u8, args: &[u8]) -> Result<(), DisplayError> {
        self.interface.send_commands(DataFormat::U8(&[op]))?;
        if !args.is_empty() {
            self.interface.send_data(DataFormat::U8(args))?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        let pulse = |rst: &mut SysfsPin, high: bool| {
            let r = if high { rst.set_high() } else { rst.set_low() };
            r.map_err(|e| DisplayError::GpioError(format!("reset: {:?}", e)))
        };
        pulse(&mut self.rst, false)?;
        thread::sleep(Duration::from_millis(10));
        pulse(&mut self.rst, true)?;
        thread::sleep(Duration::from_millis(10));
        Ok(())
    }

    fn set_window(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::SET_COLUMN, &[COLUMN_START, COLUMN_END])?;
        self.command(cmd::SET_ROW, &[0x00, (DISPLAY_HEIGHT - 1) as u8])?;
        self.command(cmd::WRITE_RAM, &[])
    }

    fn write_ram(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.set_window()?;
        self.interface.send_data(DataFormat::U8(bytes))?;
        Ok(())
    }
}

impl DisplayDriver for Ssd1322Driver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.reset()?;
        let sequence: [(u8, &[u8]); 21] = [
            (cmd::LOCK, &[0x12]),
            (cmd::DISPLAY_OFF, &[]),
            (cmd::CLOCK_DIVIDER, &[0x91]),
            (cmd::MUX_RATIO, &[0x3F]),
            (cmd::OFFSET, &[0x00]),
            (cmd::START_LINE, &[0x00]),
            // horizontal increment, nibble remap, dual COM
            (cmd::REMAP, &[0x14, 0x11]),
            (cmd::GPIO, &[0x00]),
            (cmd::FUNCTION_SELECT, &[0x01]),
            (cmd::ENHANCEMENT_A, &[0xA0, 0xFD]),
            (cmd::CONTRAST, &[0x9F]),
            (cmd::MASTER_CONTRAST, &[0x0F]),
            (cmd::DEFAULT_GRAYSCALE, &[]),
            (cmd::PHASE_LENGTH, &[0xE2]),
            (cmd::ENHANCEMENT_B, &[0x82, 0x20]),
            (cmd::PRECHARGE_VOLTAGE, &[0x1F]),
            (cmd::SECOND_PRECHARGE, &[0x08]),
            (cmd::VCOMH, &[0x07]),
            (cmd::NORMAL, &[]),
            (cmd::EXIT_PARTIAL, &[]),
            (cmd::DISPLAY_ON, &[]),
        ];
        for (op, args) in sequence {
            self.command(op, args)
                .map_err(|e| DisplayError::InitializationFailed(format!("cmd {:#04x}: {}", op, e)))?;
        }
        self.clear()?;
        debug!("SSD1322 initialised");
        Ok(())
    }

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let expected = (self.capabilities.width, self.capabilities.height);
        if frame.dimensions() != expected {
            return Err(DisplayError::FrameSizeMismatch { expected, actual: frame.dimensions() });
        }
        self.write_ram(&frame.to_gray4_bytes())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        let blank = vec![0u8; (DISPLAY_WIDTH * DISPLAY_HEIGHT / 2) as usize];
        self.write_ram(&blank)
    }

    fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }, &[])
    }

    fn set_brightness(&mut self, value: u8) -> Result<(), DisplayError> {
        self.command(cmd::CONTRAST, &[value])
    }
}
