/*
 *  display/pipeline.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame composition: header, panel, scroll offsets, transition blend
 *  and rotation
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

use chrono::{DateTime, Local};
use core::convert::Infallible;
use embedded_graphics::draw_target::DrawTargetExt;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use std::time::Duration;

use crate::config::{Config, Rotation, SlotContent};
use crate::display::components::clock::{fit_date, ClockDisplay, ClockText};
use crate::display::components::scrollers::{ElementId, ScrollEngine};
use crate::display::components::status_bar::{StatusBar, StatusBarState};
use crate::display::components::transition::{TransitionEngine, TransitionState};
use crate::display::components::weather::{forecast_title, slot_text, WeatherDisplay};
use crate::display::error::DisplayError;
use crate::display::font::TextFont;
use crate::display::framebuffer::FrameBuffer;
use crate::display::layout::LayoutConfig;
use crate::display::traits::DisplayDriver;
use crate::display::view_sequencer::View;
use crate::weather::WeatherSnapshot;

/// Everything a frame depends on besides the clock and scroll offsets.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub view: View,
    /// Name used in the forecast title
    pub location: &'a str,
    pub snapshot: Option<&'a WeatherSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A line of text that scrolls when it overflows `area`.
#[derive(Debug, Clone)]
pub struct ScrollElement {
    pub id: ElementId,
    pub text: String,
    pub area: Rectangle,
    pub font: TextFont,
    /// Placement when the text fits
    pub align: Align,
}

impl ScrollElement {
    /// Clipped to `area`; overflowing text starts at the left edge
    /// less `offset`.
    fn draw(&self, offset: i32, target: &mut FrameBuffer) -> Result<(), Infallible> {
        let text_w = self.font.measure(&self.text);
        let box_w = self.area.size.width;
        let left = self.area.top_left.x;
        let x = if text_w <= box_w {
            match self.align {
                Align::Left => left,
                Align::Right => left + (box_w - text_w) as i32,
            }
        } else {
            left - offset
        };
        let mut clipped = target.clipped(&self.area);
        self.font.draw(&self.text, Point::new(x, self.area.top_left.y), &mut clipped)
    }
}

/// Composes one complete frame per tick from the current view state.
pub struct RenderPipeline {
    layout: LayoutConfig,
    rotation: Rotation,
    show_rain_icon: bool,
    slots: [SlotContent; 4],
    update_interval: Duration,
    transitions: TransitionEngine,
    clock: ClockDisplay,
    status_bar: StatusBar,
    weather: WeatherDisplay,
}

impl RenderPipeline {
    pub fn new(config: &Config, layout: LayoutConfig) -> Self {
        Self {
            rotation: config.rotation,
            show_rain_icon: config.show_rain_icon,
            slots: config.slots,
            update_interval: config.update_interval(),
            transitions: TransitionEngine::from_config(config),
            clock: ClockDisplay::new(layout.clone()),
            status_bar: StatusBar::new(layout.clone()),
            weather: WeatherDisplay::new(layout.clone()),
            layout,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn transitions(&self) -> &TransitionEngine {
        &self.transitions
    }

    fn status(&self, scene: &Scene<'_>, now: &DateTime<Local>) -> StatusBarState {
        match scene.snapshot {
            Some(s) => StatusBarState {
                rain: self.show_rain_icon && s.rain_likely(),
                stale: s.is_stale(now, self.update_interval),
            },
            None => StatusBarState::default(),
        }
    }

    /// The text elements of `scene`, in drawing order.
    pub fn scroll_elements(&self, scene: &Scene<'_>, now: &DateTime<Local>) -> Vec<ScrollElement> {
        let font = self.layout.text_font();
        let title_box = self
            .layout
            .title_box(self.status_bar.reserved_width(&self.status(scene, now)));
        let title = if scene.view.is_forecast() {
            forecast_title(scene.location)
        } else {
            fit_date(now, title_box.size.width, &font)
        };

        let mut elements = vec![ScrollElement {
            id: ElementId::Title,
            text: title,
            area: title_box,
            font,
            align: Align::Right,
        }];

        if let (View::ShowingCurrent(_), Some(snapshot)) = (scene.view, scene.snapshot) {
            for (i, (slot, area)) in self.slots.iter().zip(self.layout.current.slots).enumerate() {
                elements.push(ScrollElement {
                    id: ElementId::Slot(i as u8),
                    text: slot_text(*slot, snapshot, now),
                    area,
                    font,
                    align: if i == 0 { Align::Left } else { Align::Right },
                });
            }
        }
        elements
    }

    /// The view as it would appear with no transition or rotation.
    pub fn compose_content(&self, scene: &Scene<'_>, scrolls: &ScrollEngine, now: &DateTime<Local>) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.layout.width, self.layout.height);
        let Ok(()) = self.draw_content(scene, scrolls, now, &mut frame);
        frame
    }

    fn draw_content(
        &self,
        scene: &Scene<'_>,
        scrolls: &ScrollEngine,
        now: &DateTime<Local>,
        frame: &mut FrameBuffer,
    ) -> Result<(), Infallible> {
        self.clock.render(&ClockText::at(now), frame)?;
        self.status_bar.render(&self.status(scene, now), frame)?;

        match (scene.view, scene.snapshot) {
            (_, None) => self.weather.render_placeholder(frame)?,
            (View::ShowingCurrent(_), Some(s)) => self.weather.render_current(s, frame)?,
            (View::ShowingForecast(_), Some(s)) => self.weather.render_forecast(s, frame)?,
        }

        for element in self.scroll_elements(scene, now) {
            element.draw(scrolls.offset(element.id), frame)?;
        }
        Ok(())
    }

    pub fn begin_transition(&self, outgoing: FrameBuffer, now: DateTime<Local>) -> TransitionState {
        TransitionState { started_at: now, outgoing }
    }

    /// Content, then the transition blend, then rotation.
    pub fn compose_frame(
        &self,
        scene: &Scene<'_>,
        scrolls: &ScrollEngine,
        transition: Option<&TransitionState>,
        now: &DateTime<Local>,
    ) -> FrameBuffer {
        let mut frame = self.compose_content(scene, scrolls, now);
        if let Some(t) = transition {
            let progress = self.transitions.progress(&t.started_at, now);
            let modifier = self.transitions.render(progress, self.layout.width);
            TransitionEngine::apply(modifier, &mut frame, &t.outgoing);
        }
        self.rotate(&mut frame);
        frame
    }

    /// A single centred line, for conditions that stop the normal cycle.
    pub fn compose_message(&self, text: &str) -> FrameBuffer {
        let mut frame = FrameBuffer::new(self.layout.width, self.layout.height);
        let font = self.layout.text_font();
        let x = (self.layout.width as i32 - font.measure(text) as i32) / 2;
        let y = (self.layout.height as i32 - font.height() as i32) / 2;
        let Ok(()) = font.draw(text, Point::new(x.max(0), y), &mut frame);
        self.rotate(&mut frame);
        frame
    }

    fn rotate(&self, frame: &mut FrameBuffer) {
        if self.rotation == Rotation::Deg180 {
            frame.rotate_180();
        }
    }

    pub fn present(&self, frame: &FrameBuffer, driver: &mut dyn DisplayDriver) -> Result<(), DisplayError> {
        driver.write_frame(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransitionEffect;
    use crate::display::components::scrollers::ScrollTiming;
    use crate::display::drivers::mock::MockDriver;
    use crate::weather::{fixtures, LocationSlot};
    use chrono::{TimeDelta, TimeZone, Utc};

    fn fetched() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn now() -> DateTime<Local> {
        (fetched() + TimeDelta::minutes(5)).with_timezone(&Local)
    }

    fn pipeline(config: &Config) -> RenderPipeline {
        RenderPipeline::new(config, LayoutConfig::for_size(256, 64))
    }

    fn scrolls(config: &Config) -> ScrollEngine {
        ScrollEngine::new(ScrollTiming::from_config(config))
    }

    fn current<'a>(snapshot: Option<&'a WeatherSnapshot>) -> Scene<'a> {
        Scene { view: View::ShowingCurrent(LocationSlot::Primary), location: "London", snapshot }
    }

    #[test]
    fn test_current_view_elements() {
        let config = Config::default();
        let p = pipeline(&config);
        let snap = fixtures::snapshot("London", fetched());
        let elements = p.scroll_elements(&current(Some(&snap)), &now());
        let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec![ElementId::Title, ElementId::Slot(0), ElementId::Slot(1), ElementId::Slot(2), ElementId::Slot(3)]
        );
        assert_eq!(elements[1].text, "Light Rain");
        assert_eq!(elements[3].text, "Humidity: 81%");
        assert_eq!(elements[4].text, "Updated 5m ago");
    }

    #[test]
    fn test_forecast_view_has_title_only() {
        let config = Config::default();
        let p = pipeline(&config);
        let snap = fixtures::snapshot("London", fetched());
        let scene = Scene { view: View::ShowingForecast(LocationSlot::Primary), location: "London", snapshot: Some(&snap) };
        let elements = p.scroll_elements(&scene, &now());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text, "London 24h forecast");
    }

    #[test]
    fn test_rain_icon_narrows_title() {
        let mut config = Config::default();
        let snap = fixtures::snapshot("London", fetched());
        let with_icon = pipeline(&config).scroll_elements(&current(Some(&snap)), &now())[0].area;
        config.show_rain_icon = false;
        let without = pipeline(&config).scroll_elements(&current(Some(&snap)), &now())[0].area;
        assert!(with_icon.size.width < without.size.width);
    }

    #[test]
    fn test_placeholder_without_snapshot() {
        let config = Config::default();
        let p = pipeline(&config);
        let frame = p.compose_content(&current(None), &scrolls(&config), &now());
        let elements = p.scroll_elements(&current(None), &now());
        assert_eq!(elements.len(), 1);
        // placeholder sits in the content area below the header
        assert!(frame.lit_pixels() > 0);
        let below_header = (22..64).any(|y| (0..256).any(|x| frame.is_on(x, y)));
        assert!(below_header);
    }

    #[test]
    fn test_rotation_is_final_transform() {
        let mut config = Config::default();
        let snap = fixtures::snapshot("London", fetched());
        let upright = pipeline(&config).compose_frame(&current(Some(&snap)), &scrolls(&config), None, &now());
        config.rotation = Rotation::Deg180;
        let flipped = pipeline(&config).compose_frame(&current(Some(&snap)), &scrolls(&config), None, &now());
        assert_ne!(upright, flipped);
        let mut back = flipped.clone();
        back.rotate_180();
        assert_eq!(back, upright);
    }

    #[test]
    fn test_wipe_shows_outgoing_on_right() {
        let mut config = Config::default();
        config.transition_effect = TransitionEffect::Wipe;
        config.transition_duration_secs = 1.0;
        let p = pipeline(&config);
        let snap = fixtures::snapshot("London", fetched());
        let engine = scrolls(&config);
        let mut outgoing = FrameBuffer::new(256, 64);
        DrawTarget::clear(&mut outgoing, embedded_graphics::pixelcolor::BinaryColor::On).unwrap();

        let state = p.begin_transition(outgoing, now());
        let halfway = now() + TimeDelta::milliseconds(500);
        let frame = p.compose_frame(&current(Some(&snap)), &engine, Some(&state), &halfway);
        assert_eq!(frame.lit_pixels_in_columns(128, 256), 128 * 64);
        let settled = p.compose_frame(&current(Some(&snap)), &engine, Some(&state), &(now() + TimeDelta::seconds(1)));
        assert_eq!(settled, p.compose_frame(&current(Some(&snap)), &engine, None, &(now() + TimeDelta::seconds(1))));
    }

    #[test]
    fn test_message_and_present() {
        let config = Config::default();
        let p = pipeline(&config);
        let frame = p.compose_message("API Key Not Set!");
        assert!(frame.lit_pixels() > 0);

        let mut driver = MockDriver::new_with_size(256, 64);
        p.present(&frame, &mut driver).unwrap();
        assert_eq!(driver.count_on_pixels(), frame.lit_pixels());
    }
}
