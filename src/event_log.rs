use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::models::LogEntry;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Append-only audit trail, one UTF-8 line per event.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `entry` as a single line. The file is opened in append mode for
    /// every call and the line goes out in one `write_all`, so readers never
    /// see a partial line from this process.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open event log {}", self.path.display()))?;

        let line = entry.to_line();
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .with_context(|| format!("Failed to append to event log {}", self.path.display()))?;

        log_debug!("event log <- {}", line.trim_end());
        Ok(())
    }

    /// Last `limit` lines of the log, oldest first. A missing file is empty.
    pub fn recent_lines(&self, limit: usize) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read event log {}", self.path.display()))?;
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(limit);
        Ok(lines[start..].iter().map(|line| line.to_string()).collect())
    }
}
