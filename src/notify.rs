use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Information,
    Warning,
    Critical,
}

/// One-shot alert raised when a countdown first runs out.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub seconds_over: u64,
}

impl Alert {
    pub fn countdown_expired(event_name: &str, seconds_over: u64) -> Self {
        Self {
            title: "Countdown finished".into(),
            message: format!("{event_name}: over by {seconds_over} s, still counting"),
            severity: Severity::Warning,
            seconds_over,
        }
    }
}

/// Whatever renders the timer (tray icon, terminal, test harness).
pub trait NotificationSink: Send {
    fn alert(&mut self, alert: &Alert);

    /// Called on every blink toggle, and with `false` when blinking ends.
    fn set_blink(&mut self, on: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Alert(Alert),
    Blink(bool),
}

/// Sink that records everything it receives. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.lock().clone()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Alert(alert) => Some(alert.clone()),
                SinkEvent::Blink(_) => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SinkEvent>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl NotificationSink for RecordingSink {
    fn alert(&mut self, alert: &Alert) {
        self.lock().push(SinkEvent::Alert(alert.clone()));
    }

    fn set_blink(&mut self, on: bool) {
        self.lock().push(SinkEvent::Blink(on));
    }
}
