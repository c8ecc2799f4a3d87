/*
 *  weather/openweather.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	OpenWeatherMap current conditions and 3-hourly forecast
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
use chrono::{DateTime, TimeZone, Utc};
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

use crate::config::Units;
use crate::constants::{FORECAST_COLUMN_INDICES, FORECAST_DAY_WINDOW, FORECAST_RAIN_WINDOW};
use crate::deutils::title_case;
use super::{CurrentConditions, FetchError, ForecastPoint, ForecastSummary, WeatherClient, WeatherSnapshot};

const VERSION: &str = concat!("WxMonS/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    #[serde(default)]
    pressure: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    #[serde(default)]
    name: String,
    weather: Vec<OwmCondition>,
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    sys: OwmSys,
}

#[derive(Debug, Deserialize)]
struct OwmForecastEntry {
    dt: i64,
    main: OwmMain,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct OwmForecast {
    list: Vec<OwmForecastEntry>,
}

fn epoch(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Parse a `/weather` body into conditions plus the resolved place name.
pub fn parse_current(body: &str) -> Result<(String, CurrentConditions), FetchError> {
    let raw: OwmCurrent =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    let description = raw
        .weather
        .first()
        .map(|w| title_case(&w.description))
        .ok_or_else(|| FetchError::Malformed("no weather conditions".into()))?;
    let current = CurrentConditions {
        description,
        temperature: raw.main.temp,
        temp_min: raw.main.temp_min,
        temp_max: raw.main.temp_max,
        humidity: raw.main.humidity.round().clamp(0.0, 100.0) as u8,
        pressure: raw.main.pressure,
        wind_speed: raw.wind.speed,
        wind_deg: raw.wind.deg,
        sunrise: raw.sys.sunrise.and_then(epoch),
        sunset: raw.sys.sunset.and_then(epoch),
    };
    Ok((raw.name, current))
}

/// Reduce a `/forecast` body to the panel summary.
///
/// Returns `Ok(None)` when fewer than 24 hours of entries came back.
pub fn summarize_forecast(body: &str) -> Result<Option<ForecastSummary>, FetchError> {
    let raw: OwmForecast =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    if raw.list.len() < FORECAST_DAY_WINDOW {
        return Ok(None);
    }
    let day = &raw.list[..FORECAST_DAY_WINDOW];
    let rain_probability_12h = raw.list[..FORECAST_RAIN_WINDOW]
        .iter()
        .map(|e| e.pop)
        .fold(0.0_f64, f64::max)
        .clamp(0.0, 1.0);
    let high = day.iter().map(|e| e.main.temp_max).fold(f64::MIN, f64::max);
    let low = day.iter().map(|e| e.main.temp_min).fold(f64::MAX, f64::min);
    let columns = FORECAST_COLUMN_INDICES
        .iter()
        .filter_map(|&i| {
            let e = &raw.list[i];
            Some(ForecastPoint {
                at: epoch(e.dt)?,
                temperature: e.main.temp,
                rain_probability: e.pop.clamp(0.0, 1.0),
            })
        })
        .collect();
    Ok(Some(ForecastSummary { rain_probability_12h, high, low, columns }))
}

/// Decode a body that may or may not be gzip encoded.
pub(crate) fn decode_body(raw: &[u8]) -> String {
    let mut decoder = GzDecoder::new(raw);
    let mut decoded = String::new();
    match decoder.read_to_string(&mut decoded) {
        Ok(_) => decoded,
        Err(_) => String::from_utf8_lossy(raw).to_string(),
    }
}

fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
        s if !s.is_success() => Err(FetchError::Status(s.as_u16())),
        _ => Ok(()),
    }
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Accept-Encoding", header::HeaderValue::from_static("gzip"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, endpoint: &str, location: &str, units: Units) -> Result<String, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", units.api_name())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        classify_status(response.status())?;
        let raw = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(decode_body(&raw))
    }
}

impl WeatherClient for OpenWeatherClient {
    async fn fetch(&self, location: &str, units: Units) -> Result<WeatherSnapshot, FetchError> {
        info!("Fetching weather data for {}...", location);
        let body = self.get("weather", location, units).await?;
        let (name, current) = parse_current(&body)?;

        // the panel still works without the forecast, so this is soft
        let forecast = match self.get("forecast", location, units).await {
            Ok(body) => summarize_forecast(&body).unwrap_or_else(|e| {
                warn!("Forecast for {} unusable: {}", location, e);
                None
            }),
            Err(e) => {
                warn!("Forecast fetch for {} failed: {}", location, e);
                None
            }
        };
        debug!("{}: {} {:.1}", location, current.description, current.temperature);

        Ok(WeatherSnapshot {
            location: location.to_string(),
            display_name: if name.is_empty() { location.to_string() } else { name },
            units,
            current,
            forecast,
            fetched_at: Utc::now(),
            valid: true,
        })
    }
}
