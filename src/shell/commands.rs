use clap::{Parser, Subcommand, ValueEnum};

use crate::timer::{format_hms, SpecMode, TimerEngine, Transition};

#[derive(Debug, Parser)]
#[command(name = "traytimer", no_binary_name = true, disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Seconds (`90`) or minutes:seconds (`1:30`)
    Duration,
    /// Next occurrence of HH:MM or HH:MM:SS
    Clock,
}

impl From<ModeArg> for SpecMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Duration => SpecMode::Duration,
            ModeArg::Clock => SpecMode::ClockTime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ShellCommand {
    /// Start counting up
    Up {
        /// Event name (defaults to "unnamed task")
        name: Vec<String>,
    },
    /// Start a countdown
    Down {
        /// How to read SPEC
        #[arg(short, long, value_enum, default_value_t = ModeArg::Duration)]
        mode: ModeArg,
        /// 90, 1:30, 15:10 or 15:10:10 depending on --mode
        spec: String,
        /// Event name (defaults to "unnamed task")
        name: Vec<String>,
    },
    /// Stop the running timer and log its duration
    Stop,
    /// Show the current status
    Status {
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the most recent event log lines
    History {
        #[arg(default_value_t = 10)]
        limit: usize,
    },
    /// Stop any running timer and exit
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`; `help` and bad input
/// come back as a clap error whose rendering is the message to show.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    CommandLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

pub fn execute(engine: &mut TimerEngine, command: ShellCommand) -> Reply {
    match command {
        ShellCommand::Up { name } => {
            let transition = engine.start_count_up(&name.join(" "));
            let message = format!("count-up started: {}", engine.state().event_name());
            with_log_warning(message, transition)
        }
        ShellCommand::Down { mode, spec, name } => {
            match engine.start_count_down_text(&name.join(" "), mode.into(), &spec) {
                Ok(transition) => {
                    let state = engine.state();
                    let target = state.target_secs().unwrap_or_default();
                    let message = format!(
                        "countdown started: {} ({})",
                        state.event_name(),
                        format_hms(i64::try_from(target).unwrap_or(i64::MAX))
                    );
                    with_log_warning(message, transition)
                }
                Err(err) => Reply::line(format!(
                    "invalid time '{spec}': {err} (duration: N or m:s, clock: HH:MM or HH:MM:SS)"
                )),
            }
        }
        ShellCommand::Stop => {
            let name = engine.state().event_name().to_string();
            let transition = engine.stop();
            if !transition.changed {
                return Reply::line("timer is not running");
            }
            with_log_warning(format!("stopped: {name}"), transition)
        }
        ShellCommand::Status { json } => {
            if json {
                match serde_json::to_string(&engine.snapshot()) {
                    Ok(body) => Reply::line(body),
                    Err(err) => Reply::line(format!("could not serialize status: {err}")),
                }
            } else {
                Reply::line(engine.tick().status_line())
            }
        }
        ShellCommand::History { limit } => match engine.event_log().recent_lines(limit) {
            Ok(lines) if lines.is_empty() => Reply::line("event log is empty"),
            Ok(lines) => Reply { lines, quit: false },
            Err(err) => Reply::line(format!("could not read event log: {err:#}")),
        },
        ShellCommand::Quit => Reply {
            lines: Vec::new(),
            quit: true,
        },
    }
}

fn with_log_warning(message: String, transition: Transition) -> Reply {
    let mut reply = Reply::line(message);
    if let Some(err) = transition.log_error {
        reply
            .lines
            .push(format!("warning: event log not updated: {err:#}"));
    }
    reply
}
