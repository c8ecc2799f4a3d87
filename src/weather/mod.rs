/*
 *  weather/mod.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Weather snapshots and the client seam
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

pub mod cache;
pub mod openweather;
pub mod store;

pub use cache::{RefreshOutcome, WeatherCache};
pub use openweather::OpenWeatherClient;
pub use store::{SnapshotStore, StoreError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::Units;
use crate::constants::RAIN_ICON_THRESHOLD;

/// Which configured location a snapshot or view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationSlot {
    Primary,
    Secondary,
}

impl LocationSlot {
    pub fn index(self) -> usize {
        match self {
            LocationSlot::Primary => 0,
            LocationSlot::Secondary => 1,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(LocationSlot::Primary),
            1 => Some(LocationSlot::Secondary),
            _ => None,
        }
    }

    /// Cyclic successor over the configured locations.
    pub fn next(self, has_secondary: bool) -> Self {
        match (self, has_secondary) {
            (LocationSlot::Primary, true) => LocationSlot::Secondary,
            _ => LocationSlot::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Title-cased condition text, e.g. "Light Rain".
    pub description: String,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Percent 0-100.
    pub humidity: u8,
    /// hPa.
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_deg: f64,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub at: DateTime<Utc>,
    pub temperature: f64,
    /// Probability of precipitation 0.0-1.0.
    pub rain_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Highest probability of precipitation over the next 12 hours, 0.0-1.0.
    pub rain_probability_12h: f64,
    pub high: f64,
    pub low: f64,
    pub columns: Vec<ForecastPoint>,
}

/// Everything shown for one location, as of one fetch.
///
/// Published behind an `Arc` and never mutated once shared; a failed
/// refresh republishes a copy with `valid` cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// The configured query string for this location.
    pub location: String,
    /// Name the provider resolved the query to.
    pub display_name: String,
    pub units: Units,
    pub current: CurrentConditions,
    pub forecast: Option<ForecastSummary>,
    pub fetched_at: DateTime<Utc>,
    /// Cleared when the most recent refresh for this location failed.
    pub valid: bool,
}

impl WeatherSnapshot {
    pub fn age(&self, now: &DateTime<Local>) -> TimeDelta {
        now.with_timezone(&Utc).signed_duration_since(self.fetched_at)
    }

    /// Last refresh failed, or the data is older than one refresh interval.
    pub fn is_stale(&self, now: &DateTime<Local>, refresh_interval: Duration) -> bool {
        if !self.valid {
            return true;
        }
        match TimeDelta::from_std(refresh_interval) {
            Ok(limit) => self.age(now) > limit,
            Err(_) => false,
        }
    }

    pub fn marked_stale(&self) -> WeatherSnapshot {
        WeatherSnapshot { valid: false, ..self.clone() }
    }

    pub fn rain_likely(&self) -> bool {
        self.forecast
            .as_ref()
            .is_some_and(|f| f.rain_probability_12h >= RAIN_ICON_THRESHOLD)
    }
}

/// Why a fetch produced no snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("API key rejected")]
    Unauthorized,
    #[error("rate limited by provider")]
    RateLimited,
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Source of snapshots. The cache owns one behind an `Arc` and calls it
/// from a spawned task, hence the `Send` future.
pub trait WeatherClient: Send + Sync + 'static {
    fn fetch(
        &self,
        location: &str,
        units: Units,
    ) -> impl Future<Output = Result<WeatherSnapshot, FetchError>> + Send;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn snapshot(location: &str, fetched_at: DateTime<Utc>) -> WeatherSnapshot {
        WeatherSnapshot {
            location: location.to_string(),
            display_name: location.to_string(),
            units: Units::Metric,
            current: CurrentConditions {
                description: "Light Rain".into(),
                temperature: 12.4,
                temp_min: 9.0,
                temp_max: 14.2,
                humidity: 81,
                pressure: 1012.0,
                wind_speed: 4.1,
                wind_deg: 230.0,
                sunrise: None,
                sunset: None,
            },
            forecast: Some(ForecastSummary {
                rain_probability_12h: 0.6,
                high: 15.0,
                low: 8.0,
                columns: Vec::new(),
            }),
            fetched_at,
            valid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn location_cycle() {
        assert_eq!(LocationSlot::Primary.next(true), LocationSlot::Secondary);
        assert_eq!(LocationSlot::Secondary.next(true), LocationSlot::Primary);
        assert_eq!(LocationSlot::Primary.next(false), LocationSlot::Primary);
    }

    #[test]
    fn staleness() {
        let fetched = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let snap = fixtures::snapshot("London", fetched);
        let interval = Duration::from_secs(1800);
        let soon = (fetched + TimeDelta::minutes(10)).with_timezone(&Local);
        let later = (fetched + TimeDelta::minutes(31)).with_timezone(&Local);
        assert!(!snap.is_stale(&soon, interval));
        assert!(snap.is_stale(&later, interval));
        assert!(snap.marked_stale().is_stale(&soon, interval));
        assert!(snap.rain_likely());
    }
}
