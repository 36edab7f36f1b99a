mod cli;
pub mod event_log;
pub mod models;
pub mod notify;
pub mod settings;
pub mod shell;
pub mod timer;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use event_log::EventLog;
use settings::{resolve_settings_path, SettingsStore};
use shell::{ConsoleNotifier, ShellOptions};
use timer::TimerEngine;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; RUST_LOG overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("traytimer starting up...");

    let store = SettingsStore::new(resolve_settings_path(cli.config.clone())?);
    let settings = cli.apply(store.get());
    settings.validate()?;
    if cli.save {
        store.update(settings.clone())?;
        log::info!("settings saved to {}", store.path().display());
    }

    let log_path = settings.resolved_log_file()?;
    log::info!("event log: {}", log_path.display());
    let engine = TimerEngine::new(EventLog::new(log_path), Box::new(ConsoleNotifier));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(shell::run_shell(engine, ShellOptions::from(&settings)))
}
