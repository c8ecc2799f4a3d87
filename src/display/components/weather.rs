/*
 *  display/components/weather.rs
 *
 *  WxMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Current conditions and forecast panels
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
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::config::{SlotContent, Units};
use crate::deutils::{compass_point, format_time_ago};
use crate::display::font::{TextFont, SMALL};
use crate::display::layout::LayoutConfig;
use crate::weather::WeatherSnapshot;

pub const NO_DATA_TEXT: &str = "No weather data";
pub const FORECAST_UNAVAILABLE_TEXT: &str = "Forecast data unavailable";

/// Whole degrees with the unit suffix, e.g. "12°C".
pub fn temperature_text(value: f64, units: Units) -> String {
    // avoid "-0°C"
    let rounded = value.round();
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.0}{}", rounded, units.temperature_suffix())
}

/// Text for one configurable slot of the current panel.
pub fn slot_text(slot: SlotContent, snapshot: &WeatherSnapshot, now: &DateTime<Local>) -> String {
    let current = &snapshot.current;
    match slot {
        SlotContent::Description => current.description.clone(),
        SlotContent::Sun => match (current.sunset, current.sunrise) {
            (Some(set), _) if *now < set => {
                format!("Sunset: {}", set.with_timezone(&Local).format("%H:%M"))
            }
            (_, Some(rise)) => format!("Sunrise: {}", rise.with_timezone(&Local).format("%H:%M")),
            _ => "Sunrise: --:--".to_string(),
        },
        SlotContent::Humidity => format!("Humidity: {}%", current.humidity),
        SlotContent::LastUpdated => format_time_ago(snapshot.age(now)),
        SlotContent::Pressure => format!("Pressure: {:.0} hPa", current.pressure),
        SlotContent::Location => snapshot.display_name.clone(),
        SlotContent::WindSpeed => {
            format!("Wind: {:.1} {}", current.wind_speed, snapshot.units.wind_suffix())
        }
        SlotContent::WindDirection => format!(
            "Wind Dir: {} ({:.0}°)",
            compass_point(current.wind_deg),
            current.wind_deg
        ),
    }
}

/// Header title while the forecast panel is up.
pub fn forecast_title(location: &str) -> String {
    format!("{} 24h forecast", location)
}

fn draw_centered<D>(font: &TextFont, text: &str, center_x: i32, y: i32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let x = center_x - font.measure(text) as i32 / 2;
    font.draw(text, Point::new(x, y), target)
}

/// Weather display component
///
/// Draws the fixed parts of both panels. Slots and the title scroll, so
/// the pipeline draws those itself at their current offsets.
pub struct WeatherDisplay {
    layout: LayoutConfig,
}

impl WeatherDisplay {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Temperature with max above min beside it.
    pub fn render_current<D>(&self, snapshot: &WeatherSnapshot, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let big = self.layout.temperature_font();
        let origin = self.layout.current.temperature_origin;
        let units = snapshot.units;
        let temp = temperature_text(snapshot.current.temperature, units);
        big.draw(&temp, origin, target)?;

        let x = origin.x + big.measure(&temp) as i32 + self.layout.current.minmax_gap;
        let min_y = origin.y + big.height() as i32 - SMALL.height() as i32;
        SMALL.draw(&temperature_text(snapshot.current.temp_max, units), Point::new(x, origin.y), target)?;
        SMALL.draw(&temperature_text(snapshot.current.temp_min, units), Point::new(x, min_y), target)
    }

    /// Four time/temperature columns and the day's high, low and rain chance.
    pub fn render_forecast<D>(&self, snapshot: &WeatherSnapshot, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let fl = &self.layout.forecast;
        let Some(forecast) = snapshot.forecast.as_ref().filter(|f| !f.columns.is_empty()) else {
            return SMALL.draw(FORECAST_UNAVAILABLE_TEXT, Point::new(10, fl.time_y + 3), target);
        };
        let units = snapshot.units;

        for (point, &cx) in forecast.columns.iter().zip(fl.column_centers.iter()) {
            let at = point.at.with_timezone(&Local).format("%H:%M").to_string();
            draw_centered(&SMALL, &at, cx, fl.time_y, target)?;
            draw_centered(&SMALL, &temperature_text(point.temperature, units), cx, fl.temperature_y, target)?;
        }

        let summary = format!(
            "High {}  Low {}  Rain {:.0}%",
            temperature_text(forecast.high, units),
            temperature_text(forecast.low, units),
            forecast.rain_probability_12h * 100.0
        );
        draw_centered(&SMALL, &summary, self.layout.width as i32 / 2, fl.summary_y, target)
    }

    /// Shown until the first snapshot arrives.
    pub fn render_placeholder<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let y = self.layout.current.temperature_origin.y + 10;
        draw_centered(&SMALL, NO_DATA_TEXT, self.layout.width as i32 / 2, y, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::framebuffer::FrameBuffer;
    use crate::weather::fixtures;
    use crate::weather::ForecastPoint;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn fetched() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_slot_texts() {
        let mut snap = fixtures::snapshot("London", fetched());
        let now = (fetched() + TimeDelta::minutes(12)).with_timezone(&Local);
        assert_eq!(slot_text(SlotContent::Description, &snap, &now), "Light Rain");
        assert_eq!(slot_text(SlotContent::Humidity, &snap, &now), "Humidity: 81%");
        assert_eq!(slot_text(SlotContent::Pressure, &snap, &now), "Pressure: 1012 hPa");
        assert_eq!(slot_text(SlotContent::WindSpeed, &snap, &now), "Wind: 4.1 m/s");
        assert_eq!(slot_text(SlotContent::WindDirection, &snap, &now), "Wind Dir: SW (230°)");
        assert_eq!(slot_text(SlotContent::LastUpdated, &snap, &now), "Updated 12m ago");
        assert_eq!(slot_text(SlotContent::Location, &snap, &now), "London");

        snap.units = Units::Imperial;
        assert_eq!(slot_text(SlotContent::WindSpeed, &snap, &now), "Wind: 4.1 mph");
    }

    #[test]
    fn test_sun_slot_picks_next_event() {
        let mut snap = fixtures::snapshot("London", fetched());
        let rise = Utc.with_ymd_and_hms(2024, 6, 1, 3, 45, 0).unwrap();
        let set = Utc.with_ymd_and_hms(2024, 6, 1, 20, 20, 0).unwrap();
        snap.current.sunrise = Some(rise);
        snap.current.sunset = Some(set);

        let noon = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap().with_timezone(&Local);
        let expect_set = format!("Sunset: {}", set.with_timezone(&Local).format("%H:%M"));
        assert_eq!(slot_text(SlotContent::Sun, &snap, &noon), expect_set);

        let late = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap().with_timezone(&Local);
        let expect_rise = format!("Sunrise: {}", rise.with_timezone(&Local).format("%H:%M"));
        assert_eq!(slot_text(SlotContent::Sun, &snap, &late), expect_rise);
    }

    #[test]
    fn test_temperature_text() {
        assert_eq!(temperature_text(12.4, Units::Metric), "12°C");
        assert_eq!(temperature_text(-0.3, Units::Metric), "0°C");
        assert_eq!(temperature_text(71.6, Units::Imperial), "72°F");
    }

    #[test]
    fn test_forecast_unavailable_message() {
        let layout = LayoutConfig::for_size(256, 64);
        let panel = WeatherDisplay::new(layout);
        let mut snap = fixtures::snapshot("London", fetched());
        snap.forecast = None;
        let mut frame = FrameBuffer::new(256, 64);
        panel.render_forecast(&snap, &mut frame).unwrap();

        let mut expected = FrameBuffer::new(256, 64);
        SMALL.draw(FORECAST_UNAVAILABLE_TEXT, Point::new(10, 25), &mut expected).unwrap();
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_forecast_columns_drawn_below_header() {
        let layout = LayoutConfig::for_size(256, 64);
        let panel = WeatherDisplay::new(layout.clone());
        let mut snap = fixtures::snapshot("London", fetched());
        if let Some(f) = snap.forecast.as_mut() {
            f.columns = (0..4)
                .map(|i| ForecastPoint {
                    at: fetched() + TimeDelta::hours(3 * i),
                    temperature: 10.0 + i as f64,
                    rain_probability: 0.2,
                })
                .collect();
        }
        let mut frame = FrameBuffer::new(256, 64);
        panel.render_forecast(&snap, &mut frame).unwrap();
        assert!(frame.lit_pixels() > 0);
        for y in 0..layout.header.height as i32 {
            for x in 0..256 {
                assert!(!frame.is_on(x, y));
            }
        }
    }

    #[test]
    fn test_current_panel_and_placeholder() {
        let layout = LayoutConfig::for_size(256, 64);
        let panel = WeatherDisplay::new(layout);
        let snap = fixtures::snapshot("London", fetched());
        let mut frame = FrameBuffer::new(256, 64);
        panel.render_current(&snap, &mut frame).unwrap();
        // temperature block stays on the left half
        assert!(frame.lit_pixels_in_columns(0, 128) > 0);
        assert_eq!(frame.lit_pixels_in_columns(128, 256), 0);

        let mut blank = FrameBuffer::new(256, 64);
        panel.render_placeholder(&mut blank).unwrap();
        assert!(blank.lit_pixels() > 0);
    }
}
