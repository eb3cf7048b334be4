//! Parsing of compact, hand-typed times of day.
//!
//! Accepted shapes, after trimming surrounding whitespace:
//! - `7`, `07`, `14`: hour only
//! - `730`, `0730`, `1400`: hour and minute without separator
//! - `7:30`, `14:00`: hour and minute with a colon

use std::sync::LazyLock;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use thiserror::Error;

/// Pre-compiled grammar: 1-4 digits, or 1-2 digits, a colon and 2 digits.
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]{1,4}|[0-9]{1,2}:[0-9]{2})$").unwrap());

/// Why an input was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Reason {
    #[error("not a supported time format")]
    Unsupported,

    #[error("unsupported time format length: {0}")]
    Length(usize),

    #[error("hours out of range (0-23): {0}")]
    HourOutOfRange(u32),

    #[error("minutes out of range (0-59): {0}")]
    MinuteOutOfRange(u32),
}

/// The input could not be read as a time of day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid time {input:?}: {reason}")]
pub struct InvalidFormat {
    pub input: String,
    pub reason: Reason,
}

impl InvalidFormat {
    fn new(input: &str, reason: Reason) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parses a compact time string into an hour and minute of the day.
pub fn parse_clock(input: &str) -> Result<NaiveTime, InvalidFormat> {
    let trimmed = input.trim();
    if !TIME_RE.is_match(trimmed) {
        return Err(InvalidFormat::new(input, Reason::Unsupported));
    }

    let digits = trimmed.replace(':', "");
    let normalized = match digits.len() {
        1 | 2 => format!("{digits:0>2}00"),
        3 => format!("0{digits}"),
        4 => digits,
        len => return Err(InvalidFormat::new(input, Reason::Length(len))),
    };

    // The grammar guarantees ASCII digits, so both halves parse.
    let (hours, minutes) = normalized.split_at(2);
    let hours: u32 = hours
        .parse()
        .map_err(|_| InvalidFormat::new(input, Reason::Unsupported))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| InvalidFormat::new(input, Reason::Unsupported))?;

    if hours > 23 {
        return Err(InvalidFormat::new(input, Reason::HourOutOfRange(hours)));
    }
    if minutes > 59 {
        return Err(InvalidFormat::new(input, Reason::MinuteOutOfRange(minutes)));
    }

    NaiveTime::from_hms_opt(hours, minutes, 0)
        .ok_or_else(|| InvalidFormat::new(input, Reason::Unsupported))
}

/// Parses a compact time string anchored to the given calendar date.
pub fn parse_time_on(input: &str, date: NaiveDate) -> Result<NaiveDateTime, InvalidFormat> {
    parse_clock(input).map(|clock| date.and_time(clock))
}

/// Parses a compact time string anchored to today's local date.
///
/// Seconds and sub-seconds are always zero.
pub fn parse_time(input: &str) -> Result<NaiveDateTime, InvalidFormat> {
    parse_time_on(input, Local::now().date_naive())
}

/// Parses a daily target such as `8`, `7:42` or `0800` into a duration.
pub fn parse_target(input: &str) -> Result<Duration, InvalidFormat> {
    let clock = parse_clock(input)?;
    Ok(Duration::hours(i64::from(clock.hour())) + Duration::minutes(i64::from(clock.minute())))
}
