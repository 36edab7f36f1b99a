use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Idle,
    CountingUp,
    CountingDown,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Idle
    }
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Idle => "timer",
            TimerMode::CountingUp => "count-up",
            TimerMode::CountingDown => "countdown",
        }
    }
}

/// The single active timer. `target_secs` is present exactly when counting
/// down, and `running_anchor` exactly when not idle.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    mode: TimerMode,
    event_name: String,
    target_secs: Option<u64>,
    started_at: Option<NaiveDateTime>,
    #[serde(skip)]
    running_anchor: Option<Instant>,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn target_secs(&self) -> Option<u64> {
        self.target_secs
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.mode != TimerMode::Idle
    }

    /// Whole seconds since the episode began; `None` when idle.
    pub fn elapsed_secs(&self, now: Instant) -> Option<i64> {
        let anchor = self.running_anchor?;
        let secs = now.saturating_duration_since(anchor).as_secs();
        Some(i64::try_from(secs).unwrap_or(i64::MAX))
    }

    /// Target minus elapsed; negative once the countdown has overrun.
    pub fn remaining_secs(&self, now: Instant) -> Option<i64> {
        let target = i64::try_from(self.target_secs?).unwrap_or(i64::MAX);
        Some(target.saturating_sub(self.elapsed_secs(now)?))
    }

    pub fn begin_count_up(&mut self, event_name: String, start_at: NaiveDateTime, now: Instant) {
        *self = Self {
            mode: TimerMode::CountingUp,
            event_name,
            target_secs: None,
            started_at: Some(start_at),
            running_anchor: Some(now),
        };
    }

    /// `target_secs` must be positive; callers get it from a parsed `TimeSpec`.
    pub fn begin_countdown(
        &mut self,
        event_name: String,
        target_secs: u64,
        start_at: NaiveDateTime,
        now: Instant,
    ) {
        debug_assert!(target_secs > 0);
        *self = Self {
            mode: TimerMode::CountingDown,
            event_name,
            target_secs: Some(target_secs),
            started_at: Some(start_at),
            running_anchor: Some(now),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
