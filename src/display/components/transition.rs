/*
 *  display/components/transition.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Blink and wipe effects between views
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
use std::time::Duration;

use crate::config::{Config, TransitionEffect};
use crate::constants::BLINK_INTERVAL_MS;
use crate::display::framebuffer::FrameBuffer;
use crate::schedule::elapsed_between;

/// How the incoming frame is shown at one instant of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameModifier {
    /// Incoming frame as is.
    Full,
    /// Nothing lit.
    Blank,
    /// Incoming left of `boundary`, outgoing from it rightwards.
    Wipe { boundary: u32 },
}

/// A running transition: when it began and what was on screen before it.
#[derive(Debug, Clone)]
pub struct TransitionState {
    pub started_at: DateTime<Local>,
    pub outgoing: FrameBuffer,
}

#[derive(Debug, Clone, Copy)]
pub struct TransitionEngine {
    effect: TransitionEffect,
    duration: Duration,
}

impl TransitionEngine {
    pub fn new(effect: TransitionEffect, duration: Duration) -> Self {
        Self { effect, duration }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.transition_effect, config.transition_duration())
    }

    pub fn effect(&self) -> TransitionEffect { self.effect }
    pub fn duration(&self) -> Duration { self.duration }

    /// Fraction of the window elapsed, clamped to [0, 1].
    pub fn progress(&self, started_at: &DateTime<Local>, now: &DateTime<Local>) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = elapsed_between(started_at, now);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, state: &TransitionState, now: &DateTime<Local>) -> bool {
        self.progress(&state.started_at, now) >= 1.0
    }

    pub fn render(&self, progress: f64, width: u32) -> FrameModifier {
        if progress >= 1.0 {
            return FrameModifier::Full;
        }
        match self.effect {
            TransitionEffect::Blink => {
                let elapsed_ms = progress * self.duration.as_secs_f64() * 1000.0;
                // starts hidden, flips every interval
                if (elapsed_ms as u64 / BLINK_INTERVAL_MS) % 2 == 0 {
                    FrameModifier::Blank
                } else {
                    FrameModifier::Full
                }
            }
            TransitionEffect::Wipe => {
                let boundary = (width as f64 * progress).round() as u32;
                FrameModifier::Wipe { boundary: boundary.min(width) }
            }
        }
    }

    pub fn apply(modifier: FrameModifier, incoming: &mut FrameBuffer, outgoing: &FrameBuffer) {
        match modifier {
            FrameModifier::Full => {}
            FrameModifier::Blank => incoming.clear(),
            FrameModifier::Wipe { boundary } => incoming.blend_wipe(outgoing, boundary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone};
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    fn t0() -> DateTime<Local> {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .and_then(|n| Local.from_local_datetime(&n).earliest())
            .unwrap()
    }

    #[test]
    fn default_config_finishes_exactly_on_time() {
        let engine = TransitionEngine::from_config(&Config::default());
        let start = t0();
        let end = start + TimeDelta::milliseconds(200);
        assert_eq!(engine.progress(&start, &end), 1.0);
        let state = TransitionState { started_at: start, outgoing: FrameBuffer::new(256, 64) };
        assert!(engine.is_finished(&state, &end));
        assert!(!engine.is_finished(&state, &(end - TimeDelta::milliseconds(25))));
    }

    #[test]
    fn wipe_progress_is_monotonic_and_ends_at_one() {
        let engine = TransitionEngine::new(TransitionEffect::Wipe, Duration::from_millis(200));
        let start = t0();
        let mut last = -1.0;
        for ms in (0..=300).step_by(5) {
            let p = engine.progress(&start, &(start + TimeDelta::milliseconds(ms)));
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last);
            last = p;
        }
        assert_eq!(engine.progress(&start, &(start + TimeDelta::milliseconds(200))), 1.0);
        assert_eq!(engine.progress(&start, &(start - TimeDelta::milliseconds(20))), 0.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let engine = TransitionEngine::new(TransitionEffect::Blink, Duration::ZERO);
        assert_eq!(engine.progress(&t0(), &t0()), 1.0);
        assert_eq!(engine.render(1.0, 256), FrameModifier::Full);
    }

    #[test]
    fn wipe_boundary_tracks_progress() {
        let engine = TransitionEngine::new(TransitionEffect::Wipe, Duration::from_millis(200));
        assert_eq!(engine.render(0.0, 256), FrameModifier::Wipe { boundary: 0 });
        assert_eq!(engine.render(0.5, 256), FrameModifier::Wipe { boundary: 128 });
        assert_eq!(engine.render(0.999, 256), FrameModifier::Wipe { boundary: 256 });
        assert_eq!(engine.render(1.0, 256), FrameModifier::Full);
    }

    #[test]
    fn blink_alternates_every_interval() {
        let engine = TransitionEngine::new(TransitionEffect::Blink, Duration::from_millis(200));
        let start = t0();
        let at = |ms| engine.render(engine.progress(&start, &(start + TimeDelta::milliseconds(ms))), 256);
        assert_eq!(at(0), FrameModifier::Blank);
        assert_eq!(at(49), FrameModifier::Blank);
        assert_eq!(at(60), FrameModifier::Full);
        assert_eq!(at(110), FrameModifier::Blank);
        assert_eq!(at(160), FrameModifier::Full);
        assert_eq!(at(200), FrameModifier::Full);
    }

    #[test]
    fn apply_blends_frames() {
        let mut outgoing = FrameBuffer::new(8, 2);
        DrawTarget::clear(&mut outgoing, BinaryColor::On).unwrap();
        let mut incoming = FrameBuffer::new(8, 2);
        TransitionEngine::apply(FrameModifier::Wipe { boundary: 3 }, &mut incoming, &outgoing);
        assert_eq!(incoming.lit_pixels_in_columns(0, 3), 0);
        assert_eq!(incoming.lit_pixels_in_columns(3, 8), 10);

        TransitionEngine::apply(FrameModifier::Blank, &mut incoming, &outgoing);
        assert_eq!(incoming.lit_pixels(), 0);
    }
}
