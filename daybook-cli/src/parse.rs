//! Parsing of datetime flags.
//!
//! Inputs carrying an explicit UTC offset are absolute instants. Everything
//! else is wall-clock time in the calendar's timezone.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed datetime flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeInput {
    /// Wall-clock time in the calendar's timezone.
    Local(NaiveDateTime),
    /// An instant with an explicit offset.
    Absolute(DateTime<FixedOffset>),
}

impl DateTimeInput {
    /// Wall-clock time of this input in `tz`.
    pub fn to_local(self, tz: Tz) -> NaiveDateTime {
        match self {
            DateTimeInput::Local(dt) => dt,
            DateTimeInput::Absolute(dt) => dt.with_timezone(&tz).naive_local(),
        }
    }
}

/// Parse a datetime flag: ISO 8601 / RFC 3339 forms first, then natural
/// language ("tomorrow 3pm", "next friday").
pub fn parse_datetime(input: &str) -> Result<DateTimeInput> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(DateTimeInput::Absolute(dt));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(DateTimeInput::Absolute(dt));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(DateTimeInput::Local(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(DateTimeInput::Local(date.and_time(NaiveTime::default())));
    }

    parse_natural(input).map(DateTimeInput::Local)
}

/// Natural language input through fuzzydate. Without a time of day the
/// result is the date's midnight.
fn parse_natural(input: &str) -> Result<NaiveDateTime> {
    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(input) {
        Ok(dt)
    } else {
        Ok(dt.date().and_time(NaiveTime::default()))
    }
}

/// Spell out weekday and month names ("sat", "Dec") in full. Any prefix
/// chrono itself accepts is expanded.
fn expand_abbreviations(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            if let Ok(weekday) = word.parse::<Weekday>() {
                WEEKDAY_NAMES[weekday.num_days_from_monday() as usize].to_string()
            } else if let Ok(month) = word.parse::<Month>() {
                month.name().to_lowercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Whether the input names a time of day: a clock time ("9:30", "6pm",
/// "6:30pm", "3 pm"), "noon", "midnight", or "at" followed by an hour.
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    words.iter().enumerate().any(|(i, &word)| {
        let next = words.get(i + 1).copied();
        match word {
            "noon" | "midnight" => true,
            "at" => next.is_some_and(is_hour),
            _ => is_clock_time(word) || (is_hour(word) && matches!(next, Some("am" | "pm"))),
        }
    })
}

fn is_clock_time(word: &str) -> bool {
    match word.strip_suffix("am").or_else(|| word.strip_suffix("pm")) {
        Some(hour) => is_hour(hour) || NaiveTime::parse_from_str(hour, "%H:%M").is_ok(),
        None => NaiveTime::parse_from_str(word, "%H:%M").is_ok(),
    }
}

fn is_hour(word: &str) -> bool {
    word.parse::<u32>().is_ok_and(|hour| hour <= 24)
}
