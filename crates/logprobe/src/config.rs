// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Format conventions of the log producer.
//!
//! Records are decoded against an explicit [`FormatConfig`] rather than
//! process-wide settings. The defaults follow the common JSON logger layout
//! (`time`, `level`, `message`, `error`, lowercase levels, RFC 3339 times,
//! millisecond durations); [`FormatConfig::tracing_json`] matches the JSON
//! formatter of `tracing-subscriber`.

use crate::duration_serde;
use crate::error::ConfigError;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default message field name
pub const DEFAULT_MESSAGE_KEY: &str = "message";
/// Default error field name
pub const DEFAULT_ERROR_KEY: &str = "error";
/// Default severity field name
pub const DEFAULT_LEVEL_KEY: &str = "level";
/// Default timestamp field name
pub const DEFAULT_TIMESTAMP_KEY: &str = "time";

fn default_message_key() -> String {
    DEFAULT_MESSAGE_KEY.to_string()
}

fn default_error_key() -> String {
    DEFAULT_ERROR_KEY.to_string()
}

fn default_level_key() -> String {
    DEFAULT_LEVEL_KEY.to_string()
}

fn default_timestamp_key() -> String {
    DEFAULT_TIMESTAMP_KEY.to_string()
}

fn default_duration_unit() -> Duration {
    Duration::from_millis(1)
}

/// Field names and value layouts used by the log producer
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Field holding the log message (default: "message")
    #[serde(default = "default_message_key")]
    pub message_key: String,

    /// Field holding the error text (default: "error")
    #[serde(default = "default_error_key")]
    pub error_key: String,

    /// Field holding the severity (default: "level")
    #[serde(default = "default_level_key")]
    pub level_key: String,

    /// Field holding the record timestamp (default: "time")
    #[serde(default = "default_timestamp_key")]
    pub timestamp_key: String,

    /// Layout of time values
    #[serde(default)]
    pub time_format: TimeFormat,

    /// Unit that numeric duration fields count in (default: "1ms")
    #[serde(default = "default_duration_unit", with = "duration_serde")]
    pub duration_unit: Duration,

    /// Letter case of severity names
    #[serde(default)]
    pub level_case: LevelCase,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            message_key: default_message_key(),
            error_key: default_error_key(),
            level_key: default_level_key(),
            timestamp_key: default_timestamp_key(),
            time_format: TimeFormat::default(),
            duration_unit: default_duration_unit(),
            level_case: LevelCase::default(),
        }
    }
}

impl FormatConfig {
    /// Layout written by `tracing_subscriber::fmt().json()`.
    pub fn tracing_json() -> Self {
        Self {
            timestamp_key: "timestamp".to_string(),
            level_case: LevelCase::Upper,
            ..Self::default()
        }
    }

    /// Parse a config from TOML text. Omitted keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Canonical severity string as the producer writes it.
    pub fn level_name(&self, level: Level) -> String {
        match self.level_case {
            LevelCase::Lower => level.as_str().to_string(),
            LevelCase::Upper => level.as_str().to_ascii_uppercase(),
        }
    }

    /// Parse a time value according to [`FormatConfig::time_format`].
    pub fn parse_time(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        self.time_format.parse(text)
    }
}

/// Layout of time values in the log output
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// RFC 3339, with any number of fractional digits
    #[default]
    Rfc3339,
    /// RFC 2822
    Rfc2822,
    /// `strftime` layout; values without an offset are read as UTC
    Custom(String),
}

impl TimeFormat {
    fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeFormat::Rfc3339 => DateTime::parse_from_rfc3339(text).ok(),
            TimeFormat::Rfc2822 => DateTime::parse_from_rfc2822(text).ok(),
            TimeFormat::Custom(layout) => DateTime::parse_from_str(text, layout)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, layout)
                        .ok()
                        .map(|naive| naive.and_utc().fixed_offset())
                }),
        }
    }
}

/// Letter case of severity names
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LevelCase {
    /// `info`, `warn`
    #[default]
    Lower,
    /// `INFO`, `WARN`
    Upper,
}

/// Log severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Finest detail
    Trace,
    /// Diagnostics
    Debug,
    /// Normal operation
    Info,
    /// Something unexpected
    Warn,
    /// Operation failed
    Error,
    /// Producer exits after logging
    Fatal,
    /// Producer panics after logging
    Panic,
}

impl Level {
    /// Lowercase name of the level
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Panic => "panic",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::TRACE {
            Level::Trace
        } else if level == tracing::Level::DEBUG {
            Level::Debug
        } else if level == tracing::Level::INFO {
            Level::Info
        } else if level == tracing::Level::WARN {
            Level::Warn
        } else {
            Level::Error
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
