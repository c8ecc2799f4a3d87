/*
 *  display/mod.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - driver abstraction, composition and the view cycle
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod framebuffer;
pub mod factory;

// Display drivers (hardware ones conditionally compiled based on features)
pub mod drivers;

// Fonts and screen geometry
pub mod font;
pub mod layout;

// UI components
pub mod components;

// View cycle and frame composition
pub mod view_sequencer;
pub mod pipeline;

// Display manager
pub mod manager;

// Re-exports for convenience
pub use traits::{DisplayDriver, DisplayCapabilities, ColorDepth};
pub use error::DisplayError;
pub use framebuffer::FrameBuffer;
pub use factory::{DisplayDriverFactory, BoxedDriver};
pub use layout::LayoutConfig;
pub use manager::{DisplayManager, TickReport};
pub use pipeline::{RenderPipeline, Scene};
pub use view_sequencer::{AdvancePolicy, View, ViewSequencer};
pub use drivers::mock::MockDriver;

#[cfg(feature = "driver-ssd1322")]
pub use drivers::ssd1322::Ssd1322Driver;
