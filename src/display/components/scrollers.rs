/*
 *  display/components/scrollers.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Phased horizontal scrolling for text wider than its box
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
use log::debug;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Config;
use crate::constants::SCROLL_PIXELS_PER_SECOND;
use crate::display::font::TextFont;
use crate::schedule::elapsed_between;

/// A text element that may scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Current panel slot, 0-based.
    Slot(u8),
    /// Header title (date or forecast caption).
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Fits its box, never moves.
    Stationary,
    PreScrollPause,
    /// Trailing edge not yet at the box's right edge.
    Scrolling,
    /// Run-out until the text has left the box.
    PostScrollPause,
    OffScreenWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTiming {
    pub pause: Duration,
    pub off_screen_wait: Duration,
    pub pixels_per_tick: i32,
}

impl ScrollTiming {
    pub fn new(pause: Duration, off_screen_wait: Duration, fps: u32) -> Self {
        let step = (SCROLL_PIXELS_PER_SECOND / fps.max(1)).max(1);
        Self { pause, off_screen_wait, pixels_per_tick: step as i32 }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scroll_pause(), config.scroll_off_screen_wait(), config.fps)
    }

    /// Length of one virtual cycle for a view with nothing to scroll.
    pub fn idle_dwell(&self) -> Duration {
        self.pause + self.off_screen_wait
    }
}

/// Scroll state for one line of text
#[derive(Debug, Clone)]
pub struct ScrollState {
    text: String,
    text_width: i32,
    box_width: i32,
    offset: i32,
    phase: ScrollPhase,
    phase_started: DateTime<Local>,
    cycles: u32,
}

impl ScrollState {
    pub fn new(text: &str, text_width: u32, box_width: u32, now: DateTime<Local>) -> Self {
        let phase = if text_width <= box_width {
            ScrollPhase::Stationary
        } else {
            ScrollPhase::PreScrollPause
        };
        Self {
            text: text.to_string(),
            text_width: text_width as i32,
            box_width: box_width as i32,
            offset: 0,
            phase,
            phase_started: now,
            cycles: 0,
        }
    }

    pub fn text(&self) -> &str { &self.text }
    pub fn offset(&self) -> i32 { self.offset }
    pub fn phase(&self) -> ScrollPhase { self.phase }
    pub fn cycles(&self) -> u32 { self.cycles }

    /// Stationary text counts as complete from the start.
    pub fn is_complete(&self) -> bool {
        self.phase == ScrollPhase::Stationary || self.cycles > 0
    }

    fn enter(&mut self, phase: ScrollPhase, now: DateTime<Local>) {
        debug!("scroll {:?} -> {:?} for {:?}", self.phase, phase, self.text);
        self.phase = phase;
        self.phase_started = now;
    }

    /// Advance one tick.
    pub fn update(&mut self, now: DateTime<Local>, timing: &ScrollTiming) {
        let in_phase = elapsed_between(&self.phase_started, &now);
        match self.phase {
            ScrollPhase::Stationary => {}
            ScrollPhase::PreScrollPause => {
                if in_phase >= timing.pause {
                    self.enter(ScrollPhase::Scrolling, now);
                }
            }
            ScrollPhase::Scrolling => {
                self.offset += timing.pixels_per_tick;
                if self.offset >= self.text_width - self.box_width {
                    self.enter(ScrollPhase::PostScrollPause, now);
                }
            }
            ScrollPhase::PostScrollPause => {
                self.offset += timing.pixels_per_tick;
                if self.offset >= self.text_width {
                    self.offset = self.text_width;
                    self.enter(ScrollPhase::OffScreenWait, now);
                }
            }
            ScrollPhase::OffScreenWait => {
                if in_phase >= timing.off_screen_wait {
                    self.cycles += 1;
                    self.offset = 0;
                    self.enter(ScrollPhase::PreScrollPause, now);
                }
            }
        }
    }
}

/// Completion summary across every element of the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub all_complete: bool,
    /// At least one element overflows its box.
    pub any_scrolling: bool,
}

/// One [`ScrollState`] per element of the current view.
#[derive(Debug)]
pub struct ScrollEngine {
    timing: ScrollTiming,
    states: HashMap<ElementId, ScrollState>,
}

impl ScrollEngine {
    pub fn new(timing: ScrollTiming) -> Self {
        Self { timing, states: HashMap::new() }
    }

    pub fn timing(&self) -> &ScrollTiming {
        &self.timing
    }

    /// Advance `id` by one tick and return its offset. A different text
    /// or box width starts the element over.
    pub fn update(
        &mut self,
        id: ElementId,
        text: &str,
        font: &TextFont,
        box_width: u32,
        now: DateTime<Local>,
    ) -> i32 {
        let text_width = font.measure(text);
        let state = self
            .states
            .entry(id)
            .or_insert_with(|| ScrollState::new(text, text_width, box_width, now));
        if state.text != text || state.box_width != box_width as i32 {
            *state = ScrollState::new(text, text_width, box_width, now);
        }
        state.update(now, &self.timing);
        state.offset
    }

    /// Offset without advancing, 0 for unknown elements.
    pub fn offset(&self, id: ElementId) -> i32 {
        self.states.get(&id).map_or(0, |s| s.offset)
    }

    pub fn phase(&self, id: ElementId) -> Option<ScrollPhase> {
        self.states.get(&id).map(|s| s.phase)
    }

    /// Forget every element, used on view changes and wake.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Drop elements that are no longer on screen.
    pub fn retain(&mut self, ids: &[ElementId]) {
        self.states.retain(|id, _| ids.contains(id));
    }

    pub fn report(&self) -> ScrollReport {
        ScrollReport {
            all_complete: self.states.values().all(ScrollState::is_complete),
            any_scrolling: self
                .states
                .values()
                .any(|s| s.phase != ScrollPhase::Stationary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::font::SMALL;
    use chrono::{NaiveDate, TimeDelta, TimeZone};

    fn t0() -> DateTime<Local> {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .and_then(|n| Local.from_local_datetime(&n).earliest())
            .unwrap()
    }

    fn tick(k: i64) -> DateTime<Local> {
        t0() + TimeDelta::milliseconds(25 * k)
    }

    fn timing() -> ScrollTiming {
        ScrollTiming::new(Duration::from_secs(2), Duration::from_secs(1), 40)
    }

    #[test]
    fn test_narrow_text_is_stationary() {
        let mut engine = ScrollEngine::new(timing());
        for k in 0..400 {
            let off = engine.update(ElementId::Slot(0), "Humidity: 81%", &SMALL, 124, tick(k));
            assert_eq!(off, 0);
        }
        assert_eq!(engine.phase(ElementId::Slot(0)), Some(ScrollPhase::Stationary));
        let report = engine.report();
        assert!(report.all_complete);
        assert!(!report.any_scrolling);
    }

    #[test]
    fn test_pixels_per_tick_from_fps() {
        assert_eq!(timing().pixels_per_tick, 1);
        assert_eq!(ScrollTiming::new(Duration::ZERO, Duration::ZERO, 10).pixels_per_tick, 4);
        assert_eq!(ScrollTiming::new(Duration::ZERO, Duration::ZERO, 60).pixels_per_tick, 1);
    }

    #[test]
    fn test_phases_in_order() {
        // 31 chars of 6px in a 124px box
        let text = "Moderate Rain With Thunderstorm";
        let width = SMALL.measure(text) as i64;
        let mut engine = ScrollEngine::new(timing());
        let id = ElementId::Slot(0);
        let mut seen = Vec::new();
        let mut completed_at = None;
        for k in 0..2000 {
            engine.update(id, text, &SMALL, 124, tick(k));
            let phase = engine.phase(id).unwrap();
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
            if completed_at.is_none() && engine.report().all_complete {
                completed_at = Some(k);
            }
        }
        assert_eq!(
            &seen[..5],
            &[
                ScrollPhase::PreScrollPause,
                ScrollPhase::Scrolling,
                ScrollPhase::PostScrollPause,
                ScrollPhase::OffScreenWait,
                ScrollPhase::PreScrollPause,
            ]
        );
        // 2s pause, one pixel per tick across the whole text, 1s off screen
        assert_eq!(completed_at, Some(80 + width + 40));
    }

    #[test]
    fn test_offset_held_during_pause_then_grows() {
        let text = "Sunset: 21:14 and a long tail of text";
        let mut engine = ScrollEngine::new(timing());
        let id = ElementId::Title;
        for k in 0..=80 {
            assert_eq!(engine.update(id, text, &SMALL, 124, tick(k)), 0);
        }
        assert_eq!(engine.update(id, text, &SMALL, 124, tick(81)), 1);
        assert_eq!(engine.update(id, text, &SMALL, 124, tick(82)), 2);
    }

    #[test]
    fn test_text_change_resets() {
        let long = "Wind Dir: WSW (230°) gusting strongly";
        let mut engine = ScrollEngine::new(timing());
        let id = ElementId::Slot(1);
        for k in 0..100 {
            engine.update(id, long, &SMALL, 124, tick(k));
        }
        assert!(engine.offset(id) > 0);
        let changed = "Wind Dir: NNE (20°) gusting strongly!";
        assert_eq!(engine.update(id, changed, &SMALL, 124, tick(100)), 0);
        assert_eq!(engine.phase(id), Some(ScrollPhase::PreScrollPause));
    }

    #[test]
    fn test_report_waits_for_every_element() {
        let mut engine = ScrollEngine::new(timing());
        let short = "Pressure: 1012 hPa";
        let long = "Heavy Intensity Shower Rain Nearby";
        let w = SMALL.measure(long) as i64;
        for k in 0..(80 + w + 40) {
            engine.update(ElementId::Slot(0), short, &SMALL, 124, tick(k));
            engine.update(ElementId::Slot(1), long, &SMALL, 124, tick(k));
            assert!(!engine.report().all_complete, "tick {}", k);
        }
        engine.update(ElementId::Slot(0), short, &SMALL, 124, tick(80 + w + 40));
        engine.update(ElementId::Slot(1), long, &SMALL, 124, tick(80 + w + 40));
        let report = engine.report();
        assert!(report.all_complete);
        assert!(report.any_scrolling);

        engine.retain(&[ElementId::Slot(0)]);
        assert!(!engine.report().any_scrolling);
        engine.reset();
        assert_eq!(engine.phase(ElementId::Slot(0)), None);
    }
}
