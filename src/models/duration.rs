//! Compact duration strings used on the wire (`1h30m`, `45m`, `30s`).

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]*(?:\.[0-9]*)?)(ns|us|µs|ms|h|m|s)").expect("duration segment regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid duration {0:?}")]
pub struct ParseDurationError(pub String);

/// Parses a Go-style duration string such as `1h30m`, `1.5h` or `250ms`.
///
/// A bare `0` is accepted. Negative durations are rejected since none of the
/// tracked timers can run backwards.
pub fn parse_duration(input: &str) -> Result<Duration, ParseDurationError> {
    let s = input.trim();
    let err = || ParseDurationError(input.to_string());

    if s == "0" {
        return Ok(Duration::zero());
    }
    if s.is_empty() || s.starts_with('-') {
        return Err(err());
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let caps = SEGMENT.captures(rest).ok_or_else(err)?;
        let number = &caps[1];
        if number.is_empty() || number == "." {
            return Err(err());
        }
        let value: f64 = number.parse().map_err(|_| err())?;
        let unit_nanos = match &caps[2] {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" => 1_000_000_000.0,
            "m" => 60.0 * 1_000_000_000.0,
            "h" => 3_600.0 * 1_000_000_000.0,
            _ => return Err(err()),
        };
        total_nanos += value * unit_nanos;
        rest = &rest[caps[0].len()..];
    }

    if total_nanos > i64::MAX as f64 {
        return Err(err());
    }
    Ok(Duration::nanoseconds(total_nanos.round() as i64))
}

/// Formats with whole-unit precision: `%dh%dm%ds` when hours are present,
/// otherwise `%dm%ds`, otherwise `%ds`.
pub fn format_duration(d: Duration) -> String {
    let hours = d.num_hours();
    let minutes = d.num_minutes() % 60;
    let seconds = d.num_seconds() % 60;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Durations are persisted as whole microseconds.
pub fn to_micros(d: Duration) -> i64 {
    d.num_microseconds().unwrap_or(i64::MAX)
}

pub fn from_micros(micros: i64) -> Duration {
    Duration::microseconds(micros)
}
