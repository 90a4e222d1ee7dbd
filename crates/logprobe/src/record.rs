// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A single decoded log record and its assertions.

use crate::config::{FormatConfig, Level};
use crate::reporter::Reporter;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outcome of looking up a key in a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyStatus {
    /// Key found with the requested type
    Found,
    /// Key found but holds a different type
    BadType,
    /// Key not in the record
    Missing,
    /// Key found but its value cannot be parsed
    BadFormat,
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyStatus::Found => "KeyFound",
            KeyStatus::BadType => "KeyBadType",
            KeyStatus::Missing => "KeyMissing",
            KeyStatus::BadFormat => "KeyBadFormat",
        })
    }
}

/// Why a record did not satisfy a check
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Failure {
    /// The key is missing, has the wrong type, or is malformed
    #[error("{0}")]
    Status(String),
    /// The key holds a value other than the expected one
    #[error("{0}")]
    Mismatch(String),
}

impl Failure {
    fn status(status: KeyStatus, key: &str, kind: &str) -> Self {
        Failure::Status(format_status(status, key, kind))
    }
}

/// Describe a failed key lookup.
pub(crate) fn format_status(status: KeyStatus, key: &str, kind: &str) -> String {
    match status {
        KeyStatus::Missing => format!("expected record to have key '{key}'"),
        KeyStatus::BadType => format!("expected record key '{key}' to be '{kind}'"),
        KeyStatus::BadFormat => format!("key '{key}' in a wrong format"),
        KeyStatus::Found => format!("invalid KeyStatus '{status}'"),
    }
}

fn zero_time() -> DateTime<FixedOffset> {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

/// One decoded log line
#[derive(Clone)]
pub struct Record {
    raw: String,
    fields: Map<String, Value>,
    config: Arc<FormatConfig>,
    reporter: Arc<dyn Reporter>,
}

impl Record {
    pub(crate) fn new(
        raw: String,
        fields: Map<String, Value>,
        config: Arc<FormatConfig>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            raw,
            fields,
            config,
            reporter,
        }
    }

    /// Source text of the record, without surrounding whitespace
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Decoded fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Format conventions the record was decoded with
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Whether the record has `key`
    pub fn has_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// String value of `key`; empty unless found
    pub fn as_string(&self, key: &str) -> (String, KeyStatus) {
        match self.fields.get(key) {
            Some(Value::String(s)) => (s.clone(), KeyStatus::Found),
            Some(_) => (String::new(), KeyStatus::BadType),
            None => (String::new(), KeyStatus::Missing),
        }
    }

    /// Numeric value of `key`; zero unless found
    pub fn as_number(&self, key: &str) -> (f64, KeyStatus) {
        match self.fields.get(key) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => (v, KeyStatus::Found),
                None => (0.0, KeyStatus::BadFormat),
            },
            Some(_) => (0.0, KeyStatus::BadType),
            None => (0.0, KeyStatus::Missing),
        }
    }

    /// Boolean value of `key`; false unless found
    pub fn as_bool(&self, key: &str) -> (bool, KeyStatus) {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => (*b, KeyStatus::Found),
            Some(_) => (false, KeyStatus::BadType),
            None => (false, KeyStatus::Missing),
        }
    }

    /// Time value of `key`, parsed with the configured time format.
    /// The zero value is the Unix epoch.
    pub fn as_timestamp(&self, key: &str) -> (DateTime<FixedOffset>, KeyStatus) {
        match self.as_string(key) {
            (text, KeyStatus::Found) => match self.config.parse_time(&text) {
                Some(time) => (time, KeyStatus::Found),
                None => (zero_time(), KeyStatus::BadFormat),
            },
            (_, status) => (zero_time(), status),
        }
    }

    /// Object value of `key`; empty unless found
    pub fn as_mapping(&self, key: &str) -> (Map<String, Value>, KeyStatus) {
        match self.fields.get(key) {
            Some(Value::Object(m)) => (m.clone(), KeyStatus::Found),
            Some(_) => (Map::new(), KeyStatus::BadType),
            None => (Map::new(), KeyStatus::Missing),
        }
    }

    /// Numeric `key` read as a whole count of the configured duration unit.
    /// Negative or out-of-range counts are `BadFormat`.
    pub fn as_duration(&self, key: &str) -> (Duration, KeyStatus) {
        match self.as_number(key) {
            (count, KeyStatus::Found) => {
                let count = count.trunc();
                if !count.is_finite() || count < 0.0 || count > u64::MAX as f64 {
                    return (Duration::ZERO, KeyStatus::BadFormat);
                }
                let nanos = (count as u128).checked_mul(self.config.duration_unit.as_nanos());
                match nanos.and_then(|n| u64::try_from(n).ok()) {
                    Some(n) => (Duration::from_nanos(n), KeyStatus::Found),
                    None => (Duration::ZERO, KeyStatus::BadFormat),
                }
            }
            (_, status) => (Duration::ZERO, status),
        }
    }

    /// Check that `key` exists
    pub fn check_key_present(&self, key: &str) -> Result<(), Failure> {
        if self.has_key(key) {
            return Ok(());
        }
        Err(Failure::status(KeyStatus::Missing, key, ""))
    }

    /// Check that `key` does not exist
    pub fn check_key_absent(&self, key: &str) -> Result<(), Failure> {
        if !self.has_key(key) {
            return Ok(());
        }
        Err(Failure::Status(format!(
            "expected record not to have key '{key}'"
        )))
    }

    /// Check that `key` is the string `exp`
    pub fn check_string(&self, key: &str, exp: &str) -> Result<(), Failure> {
        match self.as_string(key) {
            (got, KeyStatus::Found) if got == exp => Ok(()),
            (got, KeyStatus::Found) => Err(Failure::Mismatch(format!(
                "expected record key '{key}' to have value '{exp}' but got '{got}'"
            ))),
            (_, status) => Err(Failure::status(status, key, "string")),
        }
    }

    /// Check that `key` is a string containing `exp`
    pub fn check_string_contains(&self, key: &str, exp: &str) -> Result<(), Failure> {
        match self.as_string(key) {
            (got, KeyStatus::Found) if got.contains(exp) => Ok(()),
            (got, KeyStatus::Found) => Err(Failure::Mismatch(format!(
                "expected record key '{key}' to contain '{exp}' but got '{got}'"
            ))),
            (_, status) => Err(Failure::status(status, key, "string")),
        }
    }

    /// Check that `key` is the boolean `exp`
    pub fn check_bool(&self, key: &str, exp: bool) -> Result<(), Failure> {
        match self.as_bool(key) {
            (got, KeyStatus::Found) if got == exp => Ok(()),
            (got, KeyStatus::Found) => Err(Failure::Mismatch(format!(
                "expected record key '{key}' to have value '{exp}' but got '{got}'"
            ))),
            (_, status) => Err(Failure::status(status, key, "bool")),
        }
    }

    /// Check that `key` is the number `exp`. Exact comparison, no epsilon.
    #[allow(clippy::float_cmp)]
    pub fn check_number(&self, key: &str, exp: f64) -> Result<(), Failure> {
        match self.as_number(key) {
            (got, KeyStatus::Found) if got == exp => Ok(()),
            (got, KeyStatus::Found) => Err(Failure::Mismatch(format!(
                "expected record key '{key}' to have value '{exp}' but got '{got}'"
            ))),
            (_, status) => Err(Failure::status(status, key, "number")),
        }
    }

    /// Check that `key` holds exactly the instant `exp`
    pub fn check_timestamp(
        &self,
        key: &str,
        exp: impl Into<DateTime<FixedOffset>>,
    ) -> Result<(), Failure> {
        self.check_timestamp_within(key, exp, Duration::ZERO)
    }

    /// Check that `key` is no further than `tolerance` from `exp`
    pub fn check_timestamp_within(
        &self,
        key: &str,
        exp: impl Into<DateTime<FixedOffset>>,
        tolerance: Duration,
    ) -> Result<(), Failure> {
        let exp = exp.into();
        match self.as_timestamp(key) {
            (got, KeyStatus::Found) => {
                let diff = (exp - got).abs();
                let within = match TimeDelta::from_std(tolerance) {
                    Ok(tol) => diff <= tol,
                    Err(_) => true,
                };
                if within {
                    return Ok(());
                }
                let diff = diff.to_std().unwrap_or_default();
                Err(Failure::Mismatch(format!(
                    "expected record '{key}' to be within '{tolerance:?}' but is '{diff:?}'"
                )))
            }
            (_, status) => Err(Failure::status(status, key, "string")),
        }
    }

    /// Check that `key`, scaled by the duration unit, equals `exp`
    pub fn check_duration(&self, key: &str, exp: Duration) -> Result<(), Failure> {
        match self.as_duration(key) {
            (got, KeyStatus::Found) if got == exp => Ok(()),
            (got, KeyStatus::Found) => {
                let unit = self.config.duration_unit.as_nanos() as f64;
                let exp_units = exp.as_nanos() as f64 / unit;
                let got_units = got.as_nanos() as f64 / unit;
                Err(Failure::Mismatch(format!(
                    "expected record key '{key}' to have value '{exp_units}' ({exp:?}) but got '{got_units}' ({got:?})"
                )))
            }
            (_, status) => Err(Failure::status(status, key, "number")),
        }
    }

    /// Check the record timestamp against `exp` and `tolerance`
    pub fn check_logged_within(
        &self,
        exp: impl Into<DateTime<FixedOffset>>,
        tolerance: Duration,
    ) -> Result<(), Failure> {
        self.check_timestamp_within(&self.config.timestamp_key, exp, tolerance)
    }

    /// Check the message field
    pub fn check_message(&self, exp: &str) -> Result<(), Failure> {
        self.check_string(&self.config.message_key, exp)
    }

    /// Check the error field
    pub fn check_error_message(&self, exp: &str) -> Result<(), Failure> {
        self.check_string(&self.config.error_key, exp)
    }

    /// Check the level field against `exp` in the configured case
    pub fn check_severity(&self, exp: Level) -> Result<(), Failure> {
        self.check_string(&self.config.level_key, &self.config.level_name(exp))
    }

    /// Report a non-fatal failure unless `key` is present.
    #[track_caller]
    pub fn expect_key_present(&self, key: &str) {
        self.reporter.helper();
        self.report(self.check_key_present(key));
    }

    /// Report a non-fatal failure if `key` is present.
    #[track_caller]
    pub fn expect_key_absent(&self, key: &str) {
        self.reporter.helper();
        self.report(self.check_key_absent(key));
    }

    /// Expect `key` to be a string equal to `exp`.
    #[track_caller]
    pub fn expect_string(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.report(self.check_string(key, exp));
    }

    /// Expect `key` to be a string containing `exp`.
    #[track_caller]
    pub fn expect_string_contains(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.report(self.check_string_contains(key, exp));
    }

    /// Expect `key` to be the boolean `exp`.
    #[track_caller]
    pub fn expect_bool(&self, key: &str, exp: bool) {
        self.reporter.helper();
        self.report(self.check_bool(key, exp));
    }

    /// Expect `key` to be exactly the number `exp`.
    #[track_caller]
    pub fn expect_number(&self, key: &str, exp: f64) {
        self.reporter.helper();
        self.report(self.check_number(key, exp));
    }

    /// Expect `key` to hold exactly the instant `exp`.
    #[track_caller]
    pub fn expect_timestamp(&self, key: &str, exp: impl Into<DateTime<FixedOffset>>) {
        self.reporter.helper();
        self.report(self.check_timestamp(key, exp));
    }

    /// Expect `key` to hold an instant no further than `tolerance` from `exp`.
    #[track_caller]
    pub fn expect_timestamp_within(
        &self,
        key: &str,
        exp: impl Into<DateTime<FixedOffset>>,
        tolerance: Duration,
    ) {
        self.reporter.helper();
        self.report(self.check_timestamp_within(key, exp, tolerance));
    }

    /// Expect numeric `key`, scaled by the duration unit, to equal `exp`.
    #[track_caller]
    pub fn expect_duration(&self, key: &str, exp: Duration) {
        self.reporter.helper();
        self.report(self.check_duration(key, exp));
    }

    /// Expect the record timestamp to be within `tolerance` of `exp`.
    #[track_caller]
    pub fn expect_logged_within(
        &self,
        exp: impl Into<DateTime<FixedOffset>>,
        tolerance: Duration,
    ) {
        self.reporter.helper();
        self.report(self.check_logged_within(exp, tolerance));
    }

    /// Expect the message field to equal `exp`.
    #[track_caller]
    pub fn expect_message(&self, exp: &str) {
        self.reporter.helper();
        self.report(self.check_message(exp));
    }

    /// Expect the error field to equal `exp`.
    #[track_caller]
    pub fn expect_error_message(&self, exp: &str) {
        self.reporter.helper();
        self.report(self.check_error_message(exp));
    }

    /// Expect the record to have level `exp`.
    #[track_caller]
    pub fn expect_severity(&self, exp: Level) {
        self.reporter.helper();
        self.report(self.check_severity(exp));
    }

    #[track_caller]
    fn report(&self, result: Result<(), Failure>) {
        let caller = Location::caller();
        match result {
            Ok(()) => {}
            Err(Failure::Status(msg)) => self.reporter.error_at(caller, &msg),
            Err(Failure::Mismatch(msg)) => self.reporter.error_fmt_at(caller, format_args!("{msg}")),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record").field("raw", &self.raw).finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
