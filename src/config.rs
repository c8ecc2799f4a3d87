/*
 *  config.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Layered settings: defaults, YAML, environment, command line
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

use chrono::NaiveDateTime;
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::deutils::parse_flag;
use crate::schedule::OperatingHours;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Raw key/value settings, keyed by the environment variable names.
pub type Settings = BTreeMap<String, String>;

/// Longest accepted transition, in seconds.
pub const MAX_TRANSITION_SECS: f64 = 60.0;

pub const KEY_API_KEY: &str = "openWeatherApiKey";
pub const KEY_LOCATION: &str = "location";
pub const KEY_OTHER_LOCATION: &str = "otherLocation";
pub const KEY_UNITS: &str = "units";
pub const KEY_ROTATION: &str = "screenRotation";
pub const KEY_SPI_DEVICE: &str = "spiDevice";
pub const KEY_DC_PIN: &str = "dcPin";
pub const KEY_RST_PIN: &str = "rstPin";
pub const KEY_DEBUG: &str = "debug";
pub const KEY_DEBUG_DATE: &str = "debugDate";
pub const KEY_FPS: &str = "fps";
pub const KEY_UPDATE_INTERVAL: &str = "updateIntervalSeconds";
pub const KEY_API_ERROR_SLEEP: &str = "apiErrorSleepSeconds";
pub const KEY_LOG_INTERVAL: &str = "logIntervalSeconds";
pub const KEY_FORCE_REFRESH: &str = "forceRefresh";
pub const KEY_OPERATING_HOURS: &str = "operatingHours";
pub const KEY_DISPLAY_DURATION: &str = "displayDuration";
pub const KEY_SCROLL_PAUSE: &str = "scrollPauseSeconds";
pub const KEY_SCROLL_OFF_SCREEN_WAIT: &str = "scrollOffScreenWaitSeconds";
pub const KEY_TRANSITION_DURATION: &str = "transitionDurationSeconds";
pub const KEY_TRANSITION_EFFECT: &str = "transitionEffect";
pub const KEY_SHOW_RAIN_ICON: &str = "showBrollyIcon";
pub const KEY_SLOTS: [&str; 4] = ["weatherSlot1", "weatherSlot2", "weatherSlot3", "weatherSlot4"];
pub const KEY_CACHE_DIR: &str = "cacheDir";

/// Every key the loader understands; anything else in the environment is ignored.
pub const KNOWN_KEYS: [&str; 27] = [
    KEY_API_KEY, KEY_LOCATION, KEY_OTHER_LOCATION, KEY_UNITS, KEY_ROTATION,
    KEY_SPI_DEVICE, KEY_DC_PIN, KEY_RST_PIN, KEY_DEBUG, KEY_DEBUG_DATE, KEY_FPS,
    KEY_UPDATE_INTERVAL, KEY_API_ERROR_SLEEP, KEY_LOG_INTERVAL, KEY_FORCE_REFRESH,
    KEY_OPERATING_HOURS, KEY_DISPLAY_DURATION, KEY_SCROLL_PAUSE,
    KEY_SCROLL_OFF_SCREEN_WAIT, KEY_TRANSITION_DURATION, KEY_TRANSITION_EFFECT,
    KEY_SHOW_RAIN_ICON, KEY_SLOTS[0], KEY_SLOTS[1], KEY_SLOTS[2], KEY_SLOTS[3],
    KEY_CACHE_DIR,
];

const API_KEY_PLACEHOLDER: &str = "key_not_set";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter.
    pub fn api_name(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_suffix(self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            _ => Err("expected metric or imperial".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rotation {
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "180")]
    Deg180,
}

impl FromStr for Rotation {
    type Err = String;

    /// `2` is the luma.oled style "two quarter turns".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Rotation::Deg0),
            "2" | "180" => Ok(Rotation::Deg180),
            _ => Err("expected 0, 2 or 180".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionEffect {
    Blink,
    Wipe,
}

impl FromStr for TransitionEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blink" => Ok(TransitionEffect::Blink),
            "wipe" => Ok(TransitionEffect::Wipe),
            _ => Err("expected blink or wipe".into()),
        }
    }
}

/// What one of the four current-panel slots shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlotContent {
    Description,
    Sun,
    Humidity,
    LastUpdated,
    Pressure,
    Location,
    WindSpeed,
    WindDirection,
}

impl FromStr for SlotContent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match norm.as_str() {
            "desc" | "description" => Ok(SlotContent::Description),
            "sun" => Ok(SlotContent::Sun),
            "humidity" => Ok(SlotContent::Humidity),
            "lastupdated" => Ok(SlotContent::LastUpdated),
            "pressure" => Ok(SlotContent::Pressure),
            "location" => Ok(SlotContent::Location),
            "windspeed" => Ok(SlotContent::WindSpeed),
            "winddirection" => Ok(SlotContent::WindDirection),
            _ => Err("expected one of Desc, Sun, Humidity, Last updated, Pressure, \
                      Location, Wind speed, Wind direction".into()),
        }
    }
}

/// Effective, validated configuration. Built once at startup.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub location: String,
    pub other_location: Option<String>,
    pub units: Units,
    pub rotation: Rotation,
    pub spi_device: String,
    pub dc_pin: u32,
    pub rst_pin: u32,
    pub debug: bool,
    pub debug_date: Option<NaiveDateTime>,
    pub fps: u32,
    pub update_interval_secs: u64,
    pub api_error_sleep_secs: u64,
    pub log_interval_secs: u64,
    pub force_refresh: bool,
    pub operating_hours: OperatingHours,
    /// 0 means advance once every scroller has completed a cycle.
    pub display_duration_secs: u64,
    pub scroll_pause_secs: u64,
    pub scroll_off_screen_wait_secs: u64,
    pub transition_duration_secs: f64,
    pub transition_effect: TransitionEffect,
    pub show_rain_icon: bool,
    pub slots: [SlotContent; 4],
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            location: "London".into(),
            other_location: None,
            units: Units::Metric,
            rotation: Rotation::Deg0,
            spi_device: "/dev/spidev0.0".into(),
            dc_pin: 24,
            rst_pin: 25,
            debug: false,
            debug_date: None,
            fps: 40,
            update_interval_secs: 1800,
            api_error_sleep_secs: 1800,
            log_interval_secs: 1800,
            force_refresh: false,
            operating_hours: OperatingHours::default(),
            display_duration_secs: 0,
            scroll_pause_secs: 2,
            scroll_off_screen_wait_secs: 1,
            transition_duration_secs: 0.2,
            transition_effect: TransitionEffect::Wipe,
            show_rain_icon: true,
            slots: [
                SlotContent::Description,
                SlotContent::Sun,
                SlotContent::Humidity,
                SlotContent::LastUpdated,
            ],
            cache_dir: PathBuf::from("cache"),
        }
    }
}

fn parsed<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    parse_flag(raw).ok_or_else(|| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: "expected a boolean".into(),
    })
}

fn debug_date(raw: &str) -> Result<NaiveDateTime, ConfigError> {
    let s = raw.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| ConfigError::InvalidValue {
            key: KEY_DEBUG_DATE,
            value: raw.to_string(),
            reason: "expected YYYY-MM-DDTHH:MM[:SS]".into(),
        })
}

impl Config {
    /// Build from raw settings; unset keys keep their defaults.
    pub fn from_settings(settings: &Settings) -> Result<Config, ConfigError> {
        let mut cfg = Config::default();
        let get = |k: &str| settings.get(k).map(|v| v.as_str()).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(KEY_API_KEY) { cfg.api_key = v.trim().to_string(); }
        if let Some(v) = get(KEY_LOCATION) { cfg.location = v.trim().to_string(); }
        cfg.other_location = get(KEY_OTHER_LOCATION).map(|v| v.trim().to_string());
        if let Some(v) = get(KEY_UNITS) { cfg.units = parsed(KEY_UNITS, v)?; }
        if let Some(v) = get(KEY_ROTATION) { cfg.rotation = parsed(KEY_ROTATION, v)?; }
        if let Some(v) = get(KEY_SPI_DEVICE) { cfg.spi_device = v.trim().to_string(); }
        if let Some(v) = get(KEY_DC_PIN) { cfg.dc_pin = parsed(KEY_DC_PIN, v)?; }
        if let Some(v) = get(KEY_RST_PIN) { cfg.rst_pin = parsed(KEY_RST_PIN, v)?; }
        if let Some(v) = get(KEY_DEBUG) { cfg.debug = flag(KEY_DEBUG, v)?; }
        if let Some(v) = get(KEY_DEBUG_DATE) { cfg.debug_date = Some(debug_date(v)?); }
        if let Some(v) = get(KEY_FPS) { cfg.fps = parsed(KEY_FPS, v)?; }
        if let Some(v) = get(KEY_UPDATE_INTERVAL) { cfg.update_interval_secs = parsed(KEY_UPDATE_INTERVAL, v)?; }
        if let Some(v) = get(KEY_API_ERROR_SLEEP) { cfg.api_error_sleep_secs = parsed(KEY_API_ERROR_SLEEP, v)?; }
        if let Some(v) = get(KEY_LOG_INTERVAL) { cfg.log_interval_secs = parsed(KEY_LOG_INTERVAL, v)?; }
        if let Some(v) = get(KEY_FORCE_REFRESH) { cfg.force_refresh = flag(KEY_FORCE_REFRESH, v)?; }
        if let Some(v) = get(KEY_OPERATING_HOURS) { cfg.operating_hours = parsed(KEY_OPERATING_HOURS, v)?; }
        if let Some(v) = get(KEY_DISPLAY_DURATION) { cfg.display_duration_secs = parsed(KEY_DISPLAY_DURATION, v)?; }
        if let Some(v) = get(KEY_SCROLL_PAUSE) { cfg.scroll_pause_secs = parsed(KEY_SCROLL_PAUSE, v)?; }
        if let Some(v) = get(KEY_SCROLL_OFF_SCREEN_WAIT) { cfg.scroll_off_screen_wait_secs = parsed(KEY_SCROLL_OFF_SCREEN_WAIT, v)?; }
        if let Some(v) = get(KEY_TRANSITION_DURATION) { cfg.transition_duration_secs = parsed(KEY_TRANSITION_DURATION, v)?; }
        if let Some(v) = get(KEY_TRANSITION_EFFECT) { cfg.transition_effect = parsed(KEY_TRANSITION_EFFECT, v)?; }
        if let Some(v) = get(KEY_SHOW_RAIN_ICON) { cfg.show_rain_icon = flag(KEY_SHOW_RAIN_ICON, v)?; }
        for i in 0..KEY_SLOTS.len() {
            if let Some(v) = get(KEY_SLOTS[i]) {
                cfg.slots[i] = parsed(KEY_SLOTS[i], v)?;
            }
        }
        if let Some(v) = get(KEY_CACHE_DIR) { cfg.cache_dir = PathBuf::from(v.trim()); }

        validate(&cfg)?;
        Ok(cfg)
    }

    /// False for an empty key or the installer placeholder.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }

    /// Configured locations in display order, primary first.
    pub fn locations(&self) -> Vec<String> {
        let mut v = vec![self.location.clone()];
        if let Some(other) = &self.other_location {
            v.push(other.clone());
        }
        v
    }

    pub fn update_interval(&self) -> Duration { Duration::from_secs(self.update_interval_secs) }
    pub fn api_error_sleep(&self) -> Duration { Duration::from_secs(self.api_error_sleep_secs) }
    pub fn log_interval(&self) -> Duration { Duration::from_secs(self.log_interval_secs) }
    pub fn scroll_pause(&self) -> Duration { Duration::from_secs(self.scroll_pause_secs) }
    pub fn scroll_off_screen_wait(&self) -> Duration { Duration::from_secs(self.scroll_off_screen_wait_secs) }
    /// Whole microseconds, so 0.2 is exactly 200ms.
    pub fn transition_duration(&self) -> Duration {
        // `as` saturates
        Duration::from_micros((self.transition_duration_secs * 1e6).round() as u64)
    }
}

/// CLI overrides, layered over the environment and YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "WxMonS", about = "WxMonS Weather Monitor", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, short = 'c', value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Verbose logging
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    pub debug: bool,
    /// Render to the in-memory driver instead of the panel
    #[arg(long, action = ArgAction::SetTrue)]
    pub emulated: bool,
    #[arg(long)]
    pub fps: Option<u32>,
    #[arg(long)]
    pub operating_hours: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub force_refresh: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: read YAML, layer environment and CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    let mut settings = Settings::new();

    // 1) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            settings.extend(read_yaml(p)?);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        settings.extend(read_yaml(&p)?);
    }

    // 2) process environment
    settings.extend(settings_from_env(std::env::vars()));

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut settings, cli);

    Config::from_settings(&settings)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    if let Some(home) = home_dir() {
        let p = home.join(".config/wxmons/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/wxmons.yaml");
        if p.exists() { return Some(p) }
    }
    for candidate in &["wxmons.yaml", "config.yaml", "config/wxmons.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Settings, ConfigError> {
    let s = fs::read_to_string(path)?;
    yaml_settings(&s)
}

/// Flat YAML mapping of the same keys as the environment.
pub fn yaml_settings(text: &str) -> Result<Settings, ConfigError> {
    let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(text)?;
    let mut out = Settings::new();
    for (k, v) in raw {
        let s = match v {
            serde_yaml::Value::Null => continue,
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::String(s) => s,
            _ => {
                return Err(ConfigError::Validation(format!(
                    "{} must be a scalar value",
                    k
                )))
            }
        };
        out.insert(k, s);
    }
    Ok(out)
}

/// Keep only the variables the loader knows about.
pub fn settings_from_env<I>(vars: I) -> Settings
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(k, _)| KNOWN_KEYS.contains(&k.as_str()))
        .collect()
}

fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.debug { settings.insert(KEY_DEBUG.into(), "true".into()); }
    if cli.force_refresh { settings.insert(KEY_FORCE_REFRESH.into(), "true".into()); }
    if let Some(fps) = cli.fps { settings.insert(KEY_FPS.into(), fps.to_string()); }
    if let Some(h) = &cli.operating_hours { settings.insert(KEY_OPERATING_HOURS.into(), h.clone()); }
    if let Some(l) = &cli.location { settings.insert(KEY_LOCATION.into(), l.clone()); }
}

/// Range checks that parsing alone does not cover.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.location.is_empty() {
        return Err(ConfigError::Validation(format!("{} must not be empty", KEY_LOCATION)));
    }
    if cfg.fps == 0 || cfg.fps > 120 {
        return Err(ConfigError::InvalidValue {
            key: KEY_FPS,
            value: cfg.fps.to_string(),
            reason: "must be 1..=120".into(),
        });
    }
    if cfg.update_interval_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: KEY_UPDATE_INTERVAL,
            value: "0".into(),
            reason: "must be > 0".into(),
        });
    }
    if !(0.0..=MAX_TRANSITION_SECS).contains(&cfg.transition_duration_secs) {
        return Err(ConfigError::InvalidValue {
            key: KEY_TRANSITION_DURATION,
            value: cfg.transition_duration_secs.to_string(),
            reason: format!("must be 0..={}", MAX_TRANSITION_SECS),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_empty() {
        let cfg = Config::from_settings(&Settings::new()).unwrap();
        assert_eq!(cfg.location, "London");
        assert_eq!(cfg.fps, 40);
        assert_eq!(cfg.operating_hours.to_string(), "8-22");
        assert_eq!(cfg.transition_effect, TransitionEffect::Wipe);
        assert_eq!(cfg.transition_duration(), Duration::from_millis(200));
        assert_eq!(cfg.slots[3], SlotContent::LastUpdated);
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.locations(), vec!["London".to_string()]);
    }

    #[test]
    fn slots_and_enums_parse_loosely() {
        let cfg = Config::from_settings(&settings(&[
            ("weatherSlot1", "Wind speed"),
            ("weatherSlot2", "wind_direction"),
            ("weatherSlot3", "PRESSURE"),
            ("weatherSlot4", "Location"),
            ("screenRotation", "2"),
            ("units", "Imperial"),
            ("transitionEffect", "Blink"),
            ("otherLocation", "Paris"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.slots,
            [SlotContent::WindSpeed, SlotContent::WindDirection, SlotContent::Pressure, SlotContent::Location]
        );
        assert_eq!(cfg.rotation, Rotation::Deg180);
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.transition_effect, TransitionEffect::Blink);
        assert_eq!(cfg.locations().len(), 2);
    }

    #[test]
    fn bad_values_name_the_key() {
        let err = Config::from_settings(&settings(&[("weatherSlot2", "Moon phase")])).unwrap_err();
        assert!(err.to_string().contains("weatherSlot2"));
        let err = Config::from_settings(&settings(&[("operatingHours", "9-9")])).unwrap_err();
        assert!(err.to_string().contains("operatingHours"));
        let err = Config::from_settings(&settings(&[("screenRotation", "90")])).unwrap_err();
        assert!(err.to_string().contains("screenRotation"));
        assert!(Config::from_settings(&settings(&[("fps", "0")])).is_err());
        for raw in ["1e30", "-0.5", "NaN", "61"] {
            let err = Config::from_settings(&settings(&[("transitionDurationSeconds", raw)])).unwrap_err();
            assert!(err.to_string().contains("transitionDurationSeconds"), "{}", raw);
        }
        assert!(Config::from_settings(&settings(&[("debug", "perhaps")])).is_err());
    }

    #[test]
    fn placeholder_key_is_unset() {
        let cfg = Config::from_settings(&settings(&[("openWeatherApiKey", "key_not_set")])).unwrap();
        assert!(!cfg.has_api_key());
        let cfg = Config::from_settings(&settings(&[("openWeatherApiKey", "abc123")])).unwrap();
        assert!(cfg.has_api_key());
    }

    #[test]
    fn debug_date_formats() {
        let cfg = Config::from_settings(&settings(&[("debugDate", "2024-12-25T07:59:30")])).unwrap();
        assert_eq!(cfg.debug_date.unwrap().to_string(), "2024-12-25 07:59:30");
        assert!(Config::from_settings(&settings(&[("debugDate", "Christmas")])).is_err());
    }

    #[test]
    fn yaml_and_env_layering() {
        let mut s = yaml_settings("location: Leeds\nfps: 30\nshowBrollyIcon: false\nforceRefresh:\n").unwrap();
        assert_eq!(s.get("fps").map(String::as_str), Some("30"));
        assert!(!s.contains_key("forceRefresh"));
        s.extend(settings_from_env(vec![
            ("fps".to_string(), "20".to_string()),
            ("PATH".to_string(), "/usr/bin".to_string()),
        ]));
        assert!(!s.contains_key("PATH"));
        let cfg = Config::from_settings(&s).unwrap();
        assert_eq!(cfg.location, "Leeds");
        assert_eq!(cfg.fps, 20);
        assert!(!cfg.show_rain_icon);
    }

    #[test]
    fn nested_yaml_rejected() {
        assert!(yaml_settings("location:\n  name: Leeds\n").is_err());
    }
}
