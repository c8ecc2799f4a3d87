/*
 *  schedule.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Operating hours and frame cadence
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

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike};
use log::info;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Daily active window in whole local hours.
///
/// `start <= end` means `start <= h < end`, otherwise the window wraps
/// midnight and means `h >= start || h < end`. `0-24` is always active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    start: u8,
    end: u8,
}

impl OperatingHours {
    pub const ALWAYS: OperatingHours = OperatingHours { start: 0, end: 24 };

    pub fn new(start: u8, end: u8) -> Result<Self, String> {
        if start > 23 {
            return Err(format!("start hour {} is not in 0..=23", start));
        }
        if end > 24 {
            return Err(format!("end hour {} is not in 0..=24", end));
        }
        if start == end {
            return Err(format!("empty window {}-{}", start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u8 { self.start }
    pub fn end(&self) -> u8 { self.end }

    pub fn contains(&self, hour: u32) -> bool {
        let (start, end) = (self.start as u32, self.end as u32);
        if start <= end {
            start <= hour && hour < end
        } else {
            hour >= start || hour < end
        }
    }
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self { start: 8, end: 22 }
    }
}

impl fmt::Display for OperatingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for OperatingHours {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected START-END, got {:?}", s))?;
        let start = a.trim().parse::<u8>().map_err(|e| format!("start hour: {}", e))?;
        let end = b.trim().parse::<u8>().map_err(|e| format!("end hour: {}", e))?;
        Self::new(start, end)
    }
}

impl Serialize for OperatingHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Frame period for a target rate, whole microseconds.
pub fn frame_interval_for(fps: u32) -> Duration {
    Duration::from_micros(1_000_000 / fps.max(1) as u64)
}

/// Wall time between two instants, zero if `now` is earlier.
pub fn elapsed_between<Tz: TimeZone>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> Duration {
    now.clone()
        .signed_duration_since(start.clone())
        .to_std()
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub active: bool,
    pub frame_interval: Duration,
    /// Set on the first active tick after an inactive one (and on the very first tick).
    pub woke: bool,
}

/// Decides per tick whether the display should be running.
#[derive(Debug)]
pub struct ScheduleClock {
    hours: OperatingHours,
    frame_interval: Duration,
    was_active: Option<bool>,
}

impl ScheduleClock {
    pub fn new(hours: OperatingHours, fps: u32) -> Self {
        Self {
            hours,
            frame_interval: frame_interval_for(fps),
            was_active: None,
        }
    }

    pub fn hours(&self) -> OperatingHours { self.hours }
    pub fn frame_interval(&self) -> Duration { self.frame_interval }

    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ClockTick {
        let active = self.hours.contains(now.hour());
        let woke = active && self.was_active != Some(true);
        match (self.was_active, active) {
            (Some(false), true) => info!("Entering operating hours ({}), waking display", self.hours),
            (Some(true), false) | (None, false) => {
                info!("Outside operating hours ({}), display sleeping", self.hours)
            }
            _ => {}
        }
        self.was_active = Some(active);
        ClockTick { active, frame_interval: self.frame_interval, woke }
    }
}

/// Source of "now" for the render loop, optionally offset to a fixed start.
#[derive(Debug, Clone)]
pub struct WallClock {
    origin: Option<(DateTime<Local>, Instant)>,
}

impl WallClock {
    pub fn system() -> Self {
        Self { origin: None }
    }

    /// Runs from `start` at real speed, used to rehearse other times of day.
    pub fn starting_at(start: NaiveDateTime) -> Self {
        let origin = Local
            .from_local_datetime(&start)
            .earliest()
            .map(|dt| (dt, Instant::now()));
        Self { origin }
    }

    pub fn now(&self) -> DateTime<Local> {
        match &self.origin {
            Some((start, since)) => {
                let step = chrono::TimeDelta::from_std(since.elapsed()).unwrap_or_default();
                *start + step
            }
            None => Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .and_then(|n| Local.from_local_datetime(&n).earliest())
            .expect("valid local time")
    }

    #[test]
    fn day_window() {
        let hours: OperatingHours = "8-22".parse().unwrap();
        assert!(!hours.contains(7));
        assert!(hours.contains(8));
        assert!(hours.contains(21));
        assert!(!hours.contains(22));
    }

    #[test]
    fn window_across_midnight() {
        let hours: OperatingHours = "22-6".parse().unwrap();
        assert!(hours.contains(23));
        assert!(hours.contains(0));
        assert!(hours.contains(5));
        assert!(!hours.contains(6));
        assert!(!hours.contains(12));
        assert!(hours.contains(22));
    }

    #[test]
    fn always_on() {
        let hours: OperatingHours = "0-24".parse().unwrap();
        assert_eq!(hours, OperatingHours::ALWAYS);
        assert!((0..24).all(|h| hours.contains(h)));
    }

    #[test]
    fn bad_windows_rejected() {
        assert!("8".parse::<OperatingHours>().is_err());
        assert!("8-8".parse::<OperatingHours>().is_err());
        assert!("24-5".parse::<OperatingHours>().is_err());
        assert!("5-25".parse::<OperatingHours>().is_err());
        assert!("a-b".parse::<OperatingHours>().is_err());
    }

    #[test]
    fn wake_edge() {
        let mut clock = ScheduleClock::new("8-22".parse().unwrap(), 40);
        let t = clock.tick(&at(9, 0));
        assert!(t.active && t.woke);
        assert_eq!(t.frame_interval, Duration::from_millis(25));
        assert!(!clock.tick(&at(9, 1)).woke);
        let t = clock.tick(&at(23, 0));
        assert!(!t.active && !t.woke);
        let t = clock.tick(&at(8, 0));
        assert!(t.active && t.woke);
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(elapsed_between(&at(10, 0), &at(9, 0)), Duration::ZERO);
        assert_eq!(elapsed_between(&at(9, 0), &at(9, 1)), Duration::from_secs(60));
    }
}
