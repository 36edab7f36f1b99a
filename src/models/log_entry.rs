use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::timer::format_hms;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LogAction {
    CountUpStarted,
    CountUpEnded,
    CountdownStarted,
    CountdownEnded,
    /// Resolved wall-clock target of a clock-time countdown.
    TargetTime(NaiveTime),
}

impl LogAction {
    pub fn as_string(&self) -> String {
        match self {
            LogAction::CountUpStarted => "count-up-started".into(),
            LogAction::CountUpEnded => "count-up-ended".into(),
            LogAction::CountdownStarted => "countdown-started".into(),
            LogAction::CountdownEnded => "countdown-ended".into(),
            LogAction::TargetTime(time) => format!("target-time {}", time.format("%H:%M:%S")),
        }
    }
}

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub action: LogAction,
    pub event_name: String,
    pub duration_secs: Option<i64>,
}

impl LogEntry {
    pub fn new(timestamp: NaiveDateTime, action: LogAction, event_name: impl Into<String>) -> Self {
        Self {
            timestamp,
            action,
            event_name: event_name.into(),
            duration_secs: None,
        }
    }

    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration_secs = Some(seconds);
        self
    }

    /// The on-disk form, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.action.as_string(),
            self.event_name
        )?;
        if let Some(duration) = self.duration_secs {
            write!(f, " | duration: {}", format_hms(duration))?;
        }
        Ok(())
    }
}
