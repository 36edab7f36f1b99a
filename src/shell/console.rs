use crate::notify::{Alert, NotificationSink};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Terminal rendering of alerts and the blink indicator.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn alert(&mut self, alert: &Alert) {
        log_warn!("[{:?}] {}", alert.severity, alert.message);
        println!("*** {}: {}", alert.title, alert.message);
    }

    fn set_blink(&mut self, on: bool) {
        log_debug!("overrun indicator {}", if on { "lit" } else { "dark" });
    }
}
