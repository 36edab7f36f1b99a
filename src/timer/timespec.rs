use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// How countdown input should be read. There is no fallback between the two:
/// text that does not match the selected grammar is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecMode {
    /// `N` seconds or `m:s`.
    Duration,
    /// `HH:MM` or `HH:MM:SS`, the next occurrence of that wall-clock time.
    ClockTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSpecKind {
    RelativeSeconds,
    /// The resolved local wall-clock target.
    AbsoluteWallTime { target: NaiveDateTime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpec {
    pub kind: TimeSpecKind,
    /// Always greater than zero.
    pub seconds: u64,
}

impl TimeSpec {
    pub fn relative(seconds: u64) -> Result<Self, ParseError> {
        if seconds == 0 {
            return Err(ParseError::NotPositive);
        }
        Ok(Self {
            kind: TimeSpecKind::RelativeSeconds,
            seconds,
        })
    }

    pub fn target_time(&self) -> Option<NaiveTime> {
        match self.kind {
            TimeSpecKind::AbsoluteWallTime { target } => Some(target.time()),
            TimeSpecKind::RelativeSeconds => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Hours => "hours",
            Field::Minutes => "minutes",
            Field::Seconds => "seconds",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty time specification")]
    Empty,
    #[error("'{0}' is not an unsigned number")]
    NotANumber(String),
    #[error("expected {expected}, got {found} field(s)")]
    WrongFieldCount { expected: &'static str, found: usize },
    #[error("{field} value {value} is out of range (max {max})")]
    OutOfRange { field: Field, value: u64, max: u64 },
    #[error("duration must be greater than zero")]
    NotPositive,
    #[error("duration is too large")]
    Overflow,
}

/// Resolve user input into a countdown target. `now` is the local wall clock
/// and is only consulted for [`SpecMode::ClockTime`].
pub fn parse(mode: SpecMode, text: &str, now: NaiveDateTime) -> Result<TimeSpec, ParseError> {
    let fields = split_fields(text)?;
    match mode {
        SpecMode::Duration => parse_duration(&fields),
        SpecMode::ClockTime => parse_clock(&fields, now),
    }
}

fn split_fields(text: &str) -> Result<Vec<u64>, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    trimmed
        .split(':')
        .map(|token| {
            // `u64::from_str` accepts a leading '+', which is not part of the grammar.
            if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::NotANumber(token.to_string()));
            }
            token.parse::<u64>().map_err(|_| ParseError::Overflow)
        })
        .collect()
}

fn parse_duration(fields: &[u64]) -> Result<TimeSpec, ParseError> {
    let seconds = match *fields {
        [seconds] => seconds,
        [minutes, seconds] => {
            check_range(Field::Seconds, seconds, 59)?;
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or(ParseError::Overflow)?
        }
        _ => {
            return Err(ParseError::WrongFieldCount {
                expected: "N or m:s",
                found: fields.len(),
            })
        }
    };

    // Elapsed arithmetic runs on i64.
    if seconds > i64::MAX as u64 {
        return Err(ParseError::Overflow);
    }
    TimeSpec::relative(seconds)
}

fn parse_clock(fields: &[u64], now: NaiveDateTime) -> Result<TimeSpec, ParseError> {
    let (hours, minutes, seconds) = match *fields {
        [h, m] => (h, m, 0),
        [h, m, s] => (h, m, s),
        _ => {
            return Err(ParseError::WrongFieldCount {
                expected: "HH:MM or HH:MM:SS",
                found: fields.len(),
            })
        }
    };
    check_range(Field::Hours, hours, 23)?;
    check_range(Field::Minutes, minutes, 59)?;
    check_range(Field::Seconds, seconds, 59)?;

    // Range checks above make this infallible in practice.
    let time = NaiveTime::from_hms_opt(hours as u32, minutes as u32, seconds as u32).ok_or(
        ParseError::OutOfRange {
            field: Field::Hours,
            value: hours,
            max: 23,
        },
    )?;

    let mut target = now.date().and_time(time);
    if target <= now {
        target += Duration::days(1);
    }

    let millis = (target - now).num_milliseconds();
    let rounded = (millis + 500) / 1000;
    if rounded <= 0 {
        return Err(ParseError::NotPositive);
    }

    Ok(TimeSpec {
        kind: TimeSpecKind::AbsoluteWallTime { target },
        seconds: rounded as u64,
    })
}

fn check_range(field: Field, value: u64, max: u64) -> Result<(), ParseError> {
    if value > max {
        return Err(ParseError::OutOfRange { field, value, max });
    }
    Ok(())
}
