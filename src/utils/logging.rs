//! Diagnostic logging macros gated on a per-module `ENABLE_LOGS` flag.
//!
//! These go to the `log` facade (stderr through `env_logger` in the binary)
//! and are unrelated to the event log file.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn};
//!
//! log_info!("countdown started: {} s", target);
//! ```

/// `log::info!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// `log::debug!` when the calling module sets `ENABLE_LOGS`. Used for the
/// high-frequency blink and append traces.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
