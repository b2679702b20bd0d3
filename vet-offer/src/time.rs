//! Display helpers for departure times and durations.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

pub const NOT_AVAILABLE: &str = "N/A";

static CLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").ok());

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn clock_parts(value: &str) -> Option<(u32, u32)> {
    let captures = CLOCK.as_ref()?.captures(value)?;
    let hours = captures.get(1)?.as_str().parse().ok()?;
    let minutes = captures.get(2)?.as_str().parse().ok()?;
    Some((hours, minutes))
}

fn hh_mm(hours: u32, minutes: u32) -> String {
    format!("{:02}:{:02}", hours, minutes)
}

/// `HH:mm` from `HH:mm`, `HH:mm:ss`, a date-time, or any text containing a
/// clock time. Unrecognized input is returned unchanged.
pub fn format_time(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M") {
        return hh_mm(time.hour(), time.minute());
    }
    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S") {
        return hh_mm(time.hour(), time.minute());
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return hh_mm(date_time.hour(), date_time.minute());
    }
    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return hh_mm(date_time.hour(), date_time.minute());
    }

    match clock_parts(value) {
        Some((hours, minutes)) => hh_mm(hours, minutes),
        None => value.to_string(),
    }
}

/// `3h 30m`, `3h` or `45m` from a clock-style duration
pub fn format_duration(value: &str) -> String {
    let value = value.trim();
    match clock_parts(value) {
        Some((hours, minutes)) if hours > 0 && minutes > 0 => format!("{}h {}m", hours, minutes),
        Some((hours, _)) if hours > 0 => format!("{}h", hours),
        Some((_, minutes)) if minutes > 0 => format!("{}m", minutes),
        _ => value.to_string(),
    }
}

/// Time between departure and arrival as `Xh Ym`, wrapping past midnight
pub fn calculate_duration(departure: &str, arrival: &str) -> String {
    match (minutes_of_day(departure), minutes_of_day(arrival)) {
        (Some(dep), Some(arr)) => {
            let total = (arr - dep).rem_euclid(24 * 60);
            format!("{}h {}m", total / 60, total % 60)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn minutes_of_day(value: &str) -> Option<i64> {
    let mut parts = value.trim().split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    Some(hours * 60 + minutes)
}
