use crate::error::{AutofillError, Result};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "AUTOFILL_HOME";
pub const LOG_ENV: &str = "AUTOFILL_LOG";
pub const STORE_FILENAME: &str = "triggers.json";
pub const CONFIG_FILENAME: &str = "config.json";
pub const EXPORT_FILENAME: &str = "autofill_triggers.json";

pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
pub const DEFAULT_TIME_FORMAT: &str = "%I:%M %p";

/// Get the autofill data directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".autofill"))
        .unwrap_or_else(|_| PathBuf::from(".autofill"))
}

/// Ensure the data directory exists
pub fn ensure_config_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Get the path to the trigger store inside `dir`
pub fn get_store_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILENAME)
}

/// strftime patterns used to render `{{date}}` and `{{time}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroFormats {
    date: String,
    time: String,
}

impl MacroFormats {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Result<Self> {
        let date = date.into();
        let time = time.into();
        validate_strftime("date_format", &date)?;
        validate_strftime("time_format", &time)?;
        Ok(Self { date, time })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }
}

impl Default for MacroFormats {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_FORMAT.to_string(),
            time: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

fn validate_strftime(key: &str, pattern: &str) -> Result<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(AutofillError::InvalidConfig(format!(
            "{} '{}' is not a valid strftime pattern",
            key, pattern
        )));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    date_format: Option<String>,
    time_format: Option<String>,
    seed_defaults: Option<bool>,
}

/// Settings loaded from `config.json` in the data directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub formats: MacroFormats,
    pub seed_defaults: bool,
}

impl Config {
    /// Load settings from `dir`, falling back to defaults when no config file exists
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        let raw = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                RawConfig::default()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    AutofillError::InvalidConfig(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            RawConfig::default()
        };

        let formats = MacroFormats::new(
            raw.date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            raw.time_format
                .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
        )?;

        Ok(Self {
            data_dir: dir.to_path_buf(),
            formats,
            seed_defaults: raw.seed_defaults.unwrap_or(true),
        })
    }

    pub fn store_path(&self) -> PathBuf {
        get_store_path(&self.data_dir)
    }
}
