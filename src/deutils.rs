/*
 *  deutils.rs
 *
 *  WxMonS - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Formatting and parsing helpers shared by config and the panels
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

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Weekday};

/// Lenient boolean parse used for env and YAML flags.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let s = raw.trim().trim_matches('"').to_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "y" | "t" | "on" => Some(true),
        "0" | "false" | "no"  | "n" | "f" | "off" => Some(false),
        _ => None,
    }
}

/// Human readable age of a refresh, coarsest unit wins.
pub fn format_time_ago(age: TimeDelta) -> String {
    let secs = age.num_seconds().max(0);
    if secs < 60 {
        "Just updated".to_string()
    } else if secs < 3600 {
        format!("Updated {}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("Updated {}h ago", secs / 3600)
    } else {
        format!("Updated {}d ago", secs / 86_400)
    }
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Short weekday names as the panel prints them (not chrono's %a).
pub fn day_abbreviation(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tues",
        Weekday::Wed => "Weds",
        Weekday::Thu => "Thur",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Date strings for the header, longest first.
pub fn date_candidates<Tz: TimeZone>(now: &DateTime<Tz>) -> [String; 3]
where
    Tz::Offset: std::fmt::Display,
{
    let day = now.day();
    let sfx = ordinal_suffix(day);
    let full = now.format("%A");
    let month = now.format("%B");
    [
        format!("{}, {}{} {} {}", full, day, sfx, month, now.year()),
        format!("{}, {}{} {}", full, day, sfx, month),
        format!("{}, {}{} {}", day_abbreviation(now.weekday()), day, sfx, month),
    ]
}

/// Capitalise the first letter of every word, lower the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start = false;
        } else {
            out.push(c);
            start = true;
        }
    }
    out
}

/// 16 point compass name for a bearing in degrees.
pub fn compass_point(deg: f64) -> &'static str {
    let compass_points = [
        "N",  "NNE", "NE", "ENE", "E",  "ESE",
        "SE", "SSE", "S",  "SSW", "SW", "WSW",
        "W",  "WNW", "NW", "NNW"];
    let d16 = ((deg.rem_euclid(360.0) / 22.5) + 0.5) as usize % 16;
    compass_points[d16]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};

    #[test]
    fn flags() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" t "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("\"false\""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn time_ago_units() {
        assert_eq!(format_time_ago(TimeDelta::seconds(59)), "Just updated");
        assert_eq!(format_time_ago(TimeDelta::seconds(-5)), "Just updated");
        assert_eq!(format_time_ago(TimeDelta::seconds(60)), "Updated 1m ago");
        assert_eq!(format_time_ago(TimeDelta::minutes(59)), "Updated 59m ago");
        assert_eq!(format_time_ago(TimeDelta::minutes(150)), "Updated 2h ago");
        assert_eq!(format_time_ago(TimeDelta::hours(49)), "Updated 2d ago");
    }

    #[test]
    fn ordinals() {
        let got: Vec<&str> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 23, 31]
            .iter()
            .map(|d| ordinal_suffix(*d))
            .collect();
        assert_eq!(got, ["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "rd", "st"]);
    }

    #[test]
    fn dates_longest_first() {
        let dt = NaiveDate::from_ymd_opt(2024, 9, 3)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .and_then(|n| n.and_local_timezone(Local).single())
            .expect("valid local time");
        let c = date_candidates(&dt);
        assert_eq!(c[0], "Tuesday, 3rd September 2024");
        assert_eq!(c[1], "Tuesday, 3rd September");
        assert_eq!(c[2], "Tues, 3rd September");
    }

    #[test]
    fn titles_and_compass() {
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(230.0), "SW");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(-90.0), "W");
    }
}
