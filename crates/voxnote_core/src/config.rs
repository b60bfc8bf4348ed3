//! Runtime configuration for the assistant core.
//!
//! # Responsibility
//! - Provide defaults for data location, wake word and extraction limits.
//! - Apply `VOXNOTE_*` environment overrides.
//!
//! # Invariants
//! - Blank environment values are ignored, never treated as overrides.
//! - `min_content_words` is always at least 1.

use crate::interpret::slots::ExtractOptions;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_ASSISTANT_NAME: &str = "pipoo";
pub const NOTES_FILE_NAME: &str = "voxnote_notes.json";
pub const REMINDERS_FILE_NAME: &str = "voxnote_reminders.json";
const LOG_DIR_NAME: &str = "voxnote_logs";

pub const ENV_ASSISTANT_NAME: &str = "VOXNOTE_ASSISTANT_NAME";
pub const ENV_DATA_DIR: &str = "VOXNOTE_DATA_DIR";
pub const ENV_MIN_CONTENT_WORDS: &str = "VOXNOTE_MIN_CONTENT_WORDS";
pub const ENV_LOG_LEVEL: &str = "VOXNOTE_LOG_LEVEL";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} `{}`: {}", self.key, self.value, self.reason)
    }
}

impl Error for ConfigError {}

/// Assistant-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Spoken name stripped from the head of utterances.
    pub assistant_name: String,
    /// Directory holding both record files.
    pub data_dir: PathBuf,
    pub notes_file: String,
    pub reminders_file: String,
    pub min_content_words: usize,
    pub log_level: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            data_dir: dirs::home_dir().unwrap_or_else(std::env::temp_dir),
            notes_file: NOTES_FILE_NAME.to_string(),
            reminders_file: REMINDERS_FILE_NAME.to_string(),
            min_content_words: 1,
            log_level: default_log_level().to_string(),
        }
    }
}

impl AssistantConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(name) = read(ENV_ASSISTANT_NAME) {
            config.assistant_name = name;
        }
        if let Some(dir) = read(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(raw) = read(ENV_MIN_CONTENT_WORDS) {
            config.min_content_words = parse_min_words(ENV_MIN_CONTENT_WORDS, &raw)?;
        }
        Ok(config)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(&self.notes_file)
    }

    pub fn reminders_path(&self) -> PathBuf {
        self.data_dir.join(&self.reminders_file)
    }

    /// Default log directory, placed beside the record files.
    pub fn log_dir(&self) -> PathBuf {
        absolute(&self.data_dir).join(LOG_DIR_NAME)
    }

    /// Words stripped as wake words by the normalizer.
    pub fn wake_words(&self) -> Vec<&str> {
        let name = self.assistant_name.trim();
        if name.is_empty() {
            Vec::new()
        } else {
            vec![name]
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            min_content_words: self.min_content_words.max(1),
        }
    }
}

fn parse_min_words(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError {
            key,
            value: raw.to_string(),
            reason: "must be at least 1",
        }),
        Ok(value) => Ok(value),
        Err(_) => Err(ConfigError {
            key,
            value: raw.to_string(),
            reason: "expected a positive integer",
        }),
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| std::env::temp_dir().join(path))
}
