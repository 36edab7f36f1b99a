//! Headless terminal driver: owns the engine and serialises every mutation
//! through one select loop.

pub mod commands;
pub mod console;

use std::time::Duration;

use anyhow::Result;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    time::{self, MissedTickBehavior},
};

use crate::{settings::Settings, timer::TimerEngine};

pub use commands::{execute, parse_line, Reply, ShellCommand};
pub use console::ConsoleNotifier;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub tick_interval: Duration,
    pub blink_interval: Duration,
    pub watch: bool,
}

impl From<&Settings> for ShellOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            tick_interval: Duration::from_millis(settings.tick_interval_ms),
            blink_interval: Duration::from_millis(settings.blink_interval_ms),
            watch: settings.watch,
        }
    }
}

pub async fn run_shell(engine: TimerEngine, options: ShellOptions) -> Result<()> {
    println!("traytimer ready; type 'help' for commands");
    run_session(engine, options, BufReader::new(tokio::io::stdin())).await;
    Ok(())
}

/// Drive `engine` from `input` until quit, end of input, a read error, Ctrl-C
/// or SIGTERM, then close any open episode.
pub async fn run_session<R>(mut engine: TimerEngine, options: ShellOptions, input: R) -> TimerEngine
where
    R: AsyncBufRead + Unpin,
{
    let mut ticker = time::interval(options.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut blinker = time::interval(options.blink_interval);
    blinker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = input.lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let terminate = terminate_signal();
    tokio::pin!(terminate);

    let mut last_status = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let status = engine.tick().status_line();
                if options.watch && status != last_status {
                    println!("{status}");
                }
                last_status = status;
            }
            _ = blinker.tick() => {
                engine.blink();
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if handle_line(&mut engine, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        log_info!("stdin closed");
                        break;
                    }
                    Err(err) => {
                        log_warn!("failed to read command, shutting down: {err}");
                        break;
                    }
                }
            }
            result = &mut ctrl_c => {
                if let Err(err) = result {
                    log_warn!("ctrl-c handler failed: {err}");
                }
                log_info!("interrupted");
                break;
            }
            _ = &mut terminate => {
                log_info!("terminated");
                break;
            }
        }
    }

    shutdown(&mut engine);
    engine
}

#[cfg(unix)]
async fn terminate_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            log_warn!("SIGTERM handler unavailable: {err}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    std::future::pending::<()>().await;
}

/// Returns true when the shell should exit.
fn handle_line(engine: &mut TimerEngine, line: &str) -> bool {
    match parse_line(line) {
        Ok(Some(command)) => {
            let reply = execute(engine, command);
            for line in &reply.lines {
                println!("{line}");
            }
            reply.quit
        }
        Ok(None) => false,
        Err(err) => {
            print!("{}", err.render());
            false
        }
    }
}

/// Close an open episode so it gets its "ended" entry.
fn shutdown(engine: &mut TimerEngine) {
    if !engine.is_active() {
        return;
    }
    let name = engine.state().event_name().to_string();
    let transition = engine.stop();
    match transition.log_error {
        Some(err) => log_warn!("could not log end of '{}' on exit: {err:#}", name),
        None => log_info!("stopped '{}' on exit", name),
    }
}
