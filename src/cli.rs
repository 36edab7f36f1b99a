use std::path::PathBuf;

use clap::Parser;

use crate::settings::Settings;

const HELP_EPILOG: &str = r#"Settings resolution order:
  1) --config/-c PATH
  2) $TRAYTIMER_CONFIG
  3) <config dir>/traytimer/settings.json

Flags below override the settings file for this run; add --save to keep them.
"#;

#[derive(Debug, Parser)]
#[command(
    name = "traytimer",
    version,
    about = "Stopwatch and countdown timer with an append-only event log",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to the JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Event log location (default: <config dir>/timer.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Status refresh period in milliseconds (50..=1000)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Overrun blink period in milliseconds (50..=5000)
    #[arg(long)]
    pub blink_ms: Option<u64>,
    /// Print the status line whenever it changes
    #[arg(short, long)]
    pub watch: bool,
    /// Persist the effective settings back to the settings file
    #[arg(long)]
    pub save: bool,
}

impl Cli {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.log_file {
            settings.log_file = Some(path.clone());
        }
        if let Some(ms) = self.tick_ms {
            settings.tick_interval_ms = ms;
        }
        if let Some(ms) = self.blink_ms {
            settings.blink_interval_ms = ms;
        }
        if self.watch {
            settings.watch = true;
        }
        settings
    }
}
