use serde::Serialize;

/// What the current tick means for the overrun indicator. Derived every tick.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OverrunSignal {
    pub is_overrun: bool,
    pub seconds_over: u64,
    /// True on exactly one tick per countdown episode.
    pub should_fire_one_shot_alert: bool,
    pub blink_active: bool,
}

/// Tracks the one-shot alert and the blink indicator for a countdown episode.
#[derive(Debug, Clone, Default)]
pub struct OverrunNotifier {
    alert_fired: bool,
    blink_active: bool,
    blink_on: bool,
}

impl OverrunNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the countdown's remaining seconds for this tick. Stopwatch and
    /// idle ticks pass `None`.
    pub fn evaluate(&mut self, remaining: Option<i64>) -> OverrunSignal {
        let remaining = match remaining {
            Some(remaining) if remaining <= 0 => remaining,
            _ => {
                return OverrunSignal {
                    blink_active: self.blink_active,
                    ..OverrunSignal::default()
                }
            }
        };

        let should_fire = !self.alert_fired;
        self.alert_fired = true;
        self.blink_active = true;

        OverrunSignal {
            is_overrun: true,
            seconds_over: remaining.unsigned_abs(),
            should_fire_one_shot_alert: should_fire,
            blink_active: true,
        }
    }

    /// Flip the indicator. `None` when no blink is running.
    pub fn toggle_blink(&mut self) -> Option<bool> {
        if !self.blink_active {
            return None;
        }
        self.blink_on = !self.blink_on;
        Some(self.blink_on)
    }

    /// Start a fresh episode. Returns true if the indicator was blinking and
    /// needs to be cleared.
    pub fn reset(&mut self) -> bool {
        let was_blinking = self.blink_active;
        *self = Self::default();
        was_blinking
    }

    pub fn alert_fired(&self) -> bool {
        self.alert_fired
    }

    pub fn blink_active(&self) -> bool {
        self.blink_active
    }

    pub fn blink_on(&self) -> bool {
        self.blink_on
    }
}
