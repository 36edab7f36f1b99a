use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const ENV_CONFIG: &str = "TRAYTIMER_CONFIG";
const APP_DIR: &str = "traytimer";
const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "timer.log";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Audit trail location; `None` means `<config dir>/timer.log`.
    pub log_file: Option<PathBuf>,
    pub tick_interval_ms: u64,
    pub blink_interval_ms: u64,
    /// Print the status line every time it changes.
    pub watch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_file: None,
            tick_interval_ms: 500,
            blink_interval_ms: 500,
            watch: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        // Displayed values have one-second precision, so the tick must be at
        // least that frequent.
        if !(50..=1000).contains(&self.tick_interval_ms) {
            bail!(
                "tick_interval_ms must be between 50 and 1000, got {}",
                self.tick_interval_ms
            );
        }
        if !(50..=5000).contains(&self.blink_interval_ms) {
            bail!(
                "blink_interval_ms must be between 50 and 5000, got {}",
                self.blink_interval_ms
            );
        }
        Ok(())
    }

    pub fn resolved_log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(),
        }
    }
}

pub fn default_log_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(LOG_FILE))
        .context("could not determine config dir for the event log")
}

/// `--config` wins, then `$TRAYTIMER_CONFIG`, then `<config dir>/traytimer/settings.json`.
pub fn resolve_settings_path(cli_value: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_value {
        return Ok(path);
    }
    if let Ok(path) = std::env::var(ENV_CONFIG) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
        .context("could not determine config dir for settings")
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Load settings from `path`. A missing file gives defaults; a file that
    /// cannot be read or parsed is reported and replaced by defaults.
    pub fn new(path: PathBuf) -> Self {
        let data = if path.exists() {
            match load(&path) {
                Ok(settings) => settings,
                Err(err) => {
                    log_warn!("ignoring settings: {err:#}");
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        Self {
            path,
            data: RwLock::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Settings {
        self.read().clone()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let settings = load(&self.path)?;
        *self.write() = settings;
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Settings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Settings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn load(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
    settings.validate()?;
    Ok(settings)
}
