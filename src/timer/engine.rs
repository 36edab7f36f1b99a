use anyhow::Error;
use serde::Serialize;

use crate::{
    event_log::EventLog,
    models::{LogAction, LogEntry},
    notify::{Alert, NotificationSink},
};

use super::{
    clock::{Clock, SystemClock},
    format_hms,
    overrun::{OverrunNotifier, OverrunSignal},
    state::{TimerMode, TimerState},
    timespec::{self, ParseError, SpecMode, TimeSpec},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Stand-in for an empty or whitespace-only event name.
pub const UNNAMED_TASK: &str = "unnamed task";

pub fn normalize_event_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED_TASK.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Result of one `tick()`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub mode: TimerMode,
    /// Bare `[-]HH:MM:SS` value, or the idle label.
    pub display: String,
    pub overrun: OverrunSignal,
}

impl Tick {
    /// Display prefixed with the mode label, e.g. `countdown: 00:01:30`.
    pub fn status_line(&self) -> String {
        match self.mode {
            TimerMode::Idle => self.display.clone(),
            TimerMode::CountingDown if self.overrun.is_overrun => {
                format!("overrun: {}", self.display)
            }
            mode => format!("{}: {}", mode.label(), self.display),
        }
    }
}

/// Outcome of a start or stop. The state change has always been applied;
/// `log_error` carries a failed append for the caller to surface.
#[derive(Debug, Default)]
#[must_use]
pub struct Transition {
    pub changed: bool,
    pub entries_written: usize,
    pub log_error: Option<Error>,
}

impl Transition {
    fn noop() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub elapsed_secs: Option<i64>,
    pub remaining_secs: Option<i64>,
    pub alert_fired: bool,
    pub blink_active: bool,
    pub status: String,
}

pub struct TimerEngine {
    state: TimerState,
    overrun: OverrunNotifier,
    log: EventLog,
    sink: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl TimerEngine {
    pub fn new(log: EventLog, sink: Box<dyn NotificationSink>) -> Self {
        Self::with_clock(log, sink, Box::new(SystemClock))
    }

    pub fn with_clock(
        log: EventLog,
        sink: Box<dyn NotificationSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            state: TimerState::new(),
            overrun: OverrunNotifier::new(),
            log,
            sink,
            clock,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Begin a stopwatch episode, replacing whatever was running.
    pub fn start_count_up(&mut self, event_name: &str) -> Transition {
        let event_name = normalize_event_name(event_name);
        let wall = self.clock.wall();
        self.reset_overrun();
        self.state
            .begin_count_up(event_name.clone(), wall, self.clock.instant());

        log_info!("count-up started: {}", event_name);
        self.write_entries(&[LogEntry::new(wall, LogAction::CountUpStarted, event_name)])
    }

    /// Begin a countdown toward an already-resolved target.
    pub fn start_count_down(&mut self, event_name: &str, spec: TimeSpec) -> Transition {
        let event_name = normalize_event_name(event_name);
        let wall = self.clock.wall();
        self.reset_overrun();
        self.state
            .begin_countdown(event_name.clone(), spec.seconds, wall, self.clock.instant());

        let seconds = i64::try_from(spec.seconds).unwrap_or(i64::MAX);
        let mut entries = vec![
            LogEntry::new(wall, LogAction::CountdownStarted, event_name.clone())
                .with_duration(seconds),
        ];
        if let Some(target) = spec.target_time() {
            log_info!(
                "countdown started: {} ({} s, until {})",
                event_name,
                spec.seconds,
                target.format("%H:%M:%S")
            );
            entries.push(LogEntry::new(wall, LogAction::TargetTime(target), event_name));
        } else {
            log_info!("countdown started: {} ({} s)", event_name, spec.seconds);
        }
        self.write_entries(&entries)
    }

    /// Parse `text` under `mode` and start the countdown. A parse error leaves
    /// the engine untouched.
    pub fn start_count_down_text(
        &mut self,
        event_name: &str,
        mode: SpecMode,
        text: &str,
    ) -> Result<Transition, ParseError> {
        let spec = timespec::parse(mode, text, self.clock.wall())?;
        Ok(self.start_count_down(event_name, spec))
    }

    /// End the current episode. Does nothing while idle.
    pub fn stop(&mut self) -> Transition {
        let action = match self.state.mode() {
            TimerMode::Idle => return Transition::noop(),
            TimerMode::CountingUp => LogAction::CountUpEnded,
            TimerMode::CountingDown => LogAction::CountdownEnded,
        };

        let duration = self
            .state
            .elapsed_secs(self.clock.instant())
            .unwrap_or_default();
        let entry = LogEntry::new(self.clock.wall(), action, self.state.event_name())
            .with_duration(duration);

        log_info!(
            "{} ended: {} after {}",
            self.state.mode().label(),
            self.state.event_name(),
            format_hms(duration)
        );
        self.state.reset();
        self.reset_overrun();
        self.write_entries(&[entry])
    }

    /// Current status. Never changes the mode; may fire the one-shot alert.
    pub fn tick(&mut self) -> Tick {
        let now = self.clock.instant();
        let mode = self.state.mode();

        let display = match mode {
            TimerMode::Idle => {
                let overrun = self.overrun.evaluate(None);
                return Tick {
                    mode,
                    display: mode.label().to_string(),
                    overrun,
                };
            }
            TimerMode::CountingUp => format_hms(self.state.elapsed_secs(now).unwrap_or_default()),
            TimerMode::CountingDown => {
                let remaining = self.state.remaining_secs(now).unwrap_or_default();
                if remaining > 0 {
                    format_hms(remaining)
                } else {
                    format!("-{}", format_hms(-remaining))
                }
            }
        };

        let overrun = self.overrun.evaluate(self.state.remaining_secs(now));
        if overrun.should_fire_one_shot_alert {
            let alert = Alert::countdown_expired(self.state.event_name(), overrun.seconds_over);
            log_warn!("{}: {}", alert.title, alert.message);
            self.sink.alert(&alert);
        }

        Tick {
            mode,
            display,
            overrun,
        }
    }

    /// Advance the blink indicator; the driver calls this on the blink cadence.
    pub fn blink(&mut self) -> Option<bool> {
        let on = self.overrun.toggle_blink()?;
        log_debug!("blink {}", if on { "on" } else { "off" });
        self.sink.set_blink(on);
        Some(on)
    }

    pub fn snapshot(&mut self) -> TimerSnapshot {
        let tick = self.tick();
        let now = self.clock.instant();
        TimerSnapshot {
            elapsed_secs: self.state.elapsed_secs(now),
            remaining_secs: self.state.remaining_secs(now),
            alert_fired: self.overrun.alert_fired(),
            blink_active: self.overrun.blink_active(),
            status: tick.status_line(),
            state: self.state.clone(),
        }
    }

    fn reset_overrun(&mut self) {
        if self.overrun.reset() {
            self.sink.set_blink(false);
        }
    }

    fn write_entries(&self, entries: &[LogEntry]) -> Transition {
        let mut transition = Transition {
            changed: true,
            ..Transition::default()
        };
        for entry in entries {
            match self.log.append(entry) {
                Ok(()) => transition.entries_written += 1,
                Err(err) => {
                    log_warn!("event log append failed: {err:#}");
                    if transition.log_error.is_none() {
                        transition.log_error = Some(err);
                    }
                }
            }
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::{RecordingSink, SinkEvent},
        timer::clock::ManualClock,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::{fs, path::Path, time::Duration};

    fn ten_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn engine_at(path: &Path) -> (TimerEngine, ManualClock, RecordingSink) {
        let clock = ManualClock::new(ten_am());
        let sink = RecordingSink::new();
        let engine = TimerEngine::with_clock(
            EventLog::new(path),
            Box::new(sink.clone()),
            Box::new(clock.clone()),
        );
        (engine, clock, sink)
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn idle_tick_shows_label() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _, _) = engine_at(&dir.path().join("timer.log"));
        let tick = engine.tick();
        assert_eq!(tick.mode, TimerMode::Idle);
        assert_eq!(tick.display, "timer");
        assert_eq!(tick.status_line(), "timer");
    }

    #[test]
    fn count_up_reports_elapsed_and_logs_both_ends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timer.log");
        let (mut engine, clock, _) = engine_at(&path);

        let started = engine.start_count_up("  reading ");
        assert!(started.changed);
        assert_eq!(started.entries_written, 1);

        clock.advance_secs(3725);
        let tick = engine.tick();
        assert_eq!(tick.display, "01:02:05");
        assert_eq!(tick.status_line(), "count-up: 01:02:05");
        assert!(!tick.overrun.is_overrun);

        let stopped = engine.stop();
        assert!(stopped.log_error.is_none());
        assert_eq!(
            lines(&path),
            vec![
                "[2024-03-10 10:00:00] count-up-started: reading",
                "[2024-03-10 11:02:05] count-up-ended: reading | duration: 01:02:05",
            ]
        );
    }

    #[test]
    fn countdown_ticks_through_overrun() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, clock, sink) = engine_at(&dir.path().join("timer.log"));

        let started = engine
            .start_count_down_text("tea", SpecMode::Duration, "5")
            .unwrap();
        assert_eq!(started.entries_written, 1);

        assert_eq!(engine.tick().display, "00:00:05");
        clock.advance_secs(3);
        assert_eq!(engine.tick().display, "00:00:02");
        assert!(sink.alerts().is_empty());

        clock.advance_secs(2);
        let at_zero = engine.tick();
        assert_eq!(at_zero.display, "-00:00:00");
        assert_eq!(at_zero.status_line(), "overrun: -00:00:00");
        assert!(at_zero.overrun.should_fire_one_shot_alert);
        assert_eq!(sink.alerts().len(), 1);
        assert_eq!(sink.alerts()[0].seconds_over, 0);
        assert_eq!(sink.alerts()[0].message, "tea: over by 0 s, still counting");

        clock.advance_secs(2);
        let later = engine.tick();
        assert_eq!(later.display, "-00:00:02");
        assert!(!later.overrun.should_fire_one_shot_alert);
        assert!(later.overrun.blink_active);
        assert_eq!(sink.alerts().len(), 1);
    }

    #[test]
    fn half_second_ticks_fire_alert_once() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, clock, sink) = engine_at(&dir.path().join("timer.log"));
        let started = engine.start_count_down("t", TimeSpec::relative(2).unwrap());
        assert!(started.log_error.is_none());

        let mut fired = 0;
        for _ in 0..20 {
            clock.advance(Duration::from_millis(500));
            if engine.tick().overrun.should_fire_one_shot_alert {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(sink.alerts().len(), 1);
    }

    #[test]
    fn parse_error_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timer.log");
        let (mut engine, _, _) = engine_at(&path);

        let _ = engine.start_count_up("running");
        let err = engine
            .start_count_down_text("next", SpecMode::Duration, "1:75")
            .unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));
        assert_eq!(engine.state().mode(), TimerMode::CountingUp);
        assert_eq!(engine.state().event_name(), "running");
        assert_eq!(lines(&path).len(), 1);
    }

    #[test]
    fn clock_time_countdown_logs_target_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timer.log");
        let (mut engine, _, _) = engine_at(&path);

        let transition = engine
            .start_count_down_text("standup", SpecMode::ClockTime, "10:15")
            .unwrap();
        assert_eq!(transition.entries_written, 2);
        assert_eq!(engine.state().target_secs(), Some(900));
        assert_eq!(
            lines(&path),
            vec![
                "[2024-03-10 10:00:00] countdown-started: standup | duration: 00:15:00",
                "[2024-03-10 10:00:00] target-time 10:15:00: standup",
            ]
        );
    }

    #[test]
    fn stop_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timer.log");
        let (mut engine, clock, _) = engine_at(&path);

        let _ = engine.start_count_down_text("x", SpecMode::Duration, "1:00");
        clock.advance_secs(10);
        assert!(engine.stop().changed);
        let second = engine.stop();
        assert!(!second.changed);
        assert_eq!(second.entries_written, 0);
        assert_eq!(lines(&path).len(), 2);
        assert_eq!(engine.state().mode(), TimerMode::Idle);
    }

    #[test]
    fn stop_clears_blink_and_rearms_alert() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, clock, sink) = engine_at(&dir.path().join("timer.log"));

        let _ = engine.start_count_down_text("x", SpecMode::Duration, "1");
        clock.advance_secs(1);
        engine.tick();
        assert_eq!(engine.blink(), Some(true));
        assert_eq!(engine.blink(), Some(false));

        let _ = engine.stop();
        assert_eq!(engine.blink(), None);
        assert!(!engine.tick().overrun.blink_active);

        let _ = engine.start_count_down_text("y", SpecMode::Duration, "1");
        clock.advance_secs(2);
        assert!(engine.tick().overrun.should_fire_one_shot_alert);

        assert_eq!(
            sink.events()
                .into_iter()
                .filter(|event| matches!(event, SinkEvent::Blink(_)))
                .collect::<Vec<_>>(),
            vec![
                SinkEvent::Blink(true),
                SinkEvent::Blink(false),
                SinkEvent::Blink(false),
            ]
        );
        assert_eq!(sink.alerts().len(), 2);
    }

    #[test]
    fn restart_overwrites_without_ended_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timer.log");
        let (mut engine, clock, _) = engine_at(&path);

        let _ = engine.start_count_up("first");
        clock.advance_secs(30);
        let _ = engine.start_count_down_text("second", SpecMode::Duration, "10");
        assert_eq!(engine.state().mode(), TimerMode::CountingDown);
        assert_eq!(engine.tick().display, "00:00:10");

        let logged = lines(&path);
        assert_eq!(logged.len(), 2);
        assert!(logged[1].contains("countdown-started: second"));
    }

    #[test]
    fn blank_names_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, _, _) = engine_at(&dir.path().join("timer.log"));
        let _ = engine.start_count_up("   ");
        assert_eq!(engine.state().event_name(), UNNAMED_TASK);
    }

    #[test]
    fn log_failure_does_not_block_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let (mut engine, clock, _) = engine_at(&blocker.join("timer.log"));

        let started = engine.start_count_up("offline");
        assert!(started.changed);
        assert!(started.log_error.is_some());
        assert_eq!(engine.state().mode(), TimerMode::CountingUp);

        clock.advance_secs(2);
        assert_eq!(engine.tick().display, "00:00:02");

        let stopped = engine.stop();
        assert!(stopped.log_error.is_some());
        assert_eq!(engine.state().mode(), TimerMode::Idle);
    }

    #[test]
    fn snapshot_serializes_current_state() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, clock, _) = engine_at(&dir.path().join("timer.log"));
        let _ = engine.start_count_down_text("json", SpecMode::Duration, "1:30");
        clock.advance_secs(100);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.remaining_secs, Some(-10));
        assert!(snapshot.alert_fired);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["state"]["mode"], "countingDown");
        assert_eq!(value["state"]["targetSecs"], 90);
        assert_eq!(value["status"], "overrun: -00:00:10");
    }
}
