// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered records from one decode pass, with collection-level assertions.

use crate::config::Level;
use crate::record::{Failure, Record};
use crate::reporter::Reporter;
use chrono::{DateTime, FixedOffset};
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Records in the order they were written
#[derive(Clone)]
pub struct RecordSet {
    records: Vec<Record>,
    reporter: Arc<dyn Reporter>,
}

impl RecordSet {
    pub(crate) fn new(records: Vec<Record>, reporter: Arc<dyn Reporter>) -> Self {
        Self { records, reporter }
    }

    /// All records
    pub fn get(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record, if any
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Last record, if any
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Iterate records in write order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Records whose severity is `level`, in order
    pub fn filter(&self, level: Level) -> RecordSet {
        let records = self
            .records
            .iter()
            .filter(|r| r.check_severity(level).is_ok())
            .cloned()
            .collect();
        RecordSet::new(records, Arc::clone(&self.reporter))
    }

    /// Record at `index`. Reports a fatal failure when out of range.
    #[track_caller]
    pub fn at(&self, index: usize) -> Option<&Record> {
        let caller = Location::caller();
        self.reporter.helper();
        let record = self.records.get(index);
        if record.is_none() {
            let n = i64::try_from(index).unwrap_or(i64::MAX);
            self.reporter.fatal_fmt_at(
                caller,
                format_args!(
                    "expected {}{} logged record to exist",
                    index,
                    ordinal(n)
                ),
            );
        }
        record
    }

    /// Expect exactly `want` records.
    #[track_caller]
    pub fn expect_length(&self, want: usize) {
        let caller = Location::caller();
        self.reporter.helper();
        let have = self.records.len();
        if have != want {
            self.reporter
                .error_fmt_at(caller, format_args!("expected {want} records got {have}"));
        }
    }

    /// Expect at least one record to pass `check`. Stops at the first match.
    #[track_caller]
    pub fn expect_exists<F>(&self, mut check: F)
    where
        F: FnMut(&Record) -> Result<(), Failure>,
    {
        let caller = Location::caller();
        self.reporter.helper();
        if self.records.iter().any(|record| check(record).is_ok()) {
            return;
        }
        self.reporter.error_at(caller, "no matching record found");
    }

    /// Expect no record to pass `check`. Every match is reported.
    #[track_caller]
    pub fn expect_none_exists<F>(&self, mut check: F)
    where
        F: FnMut(&Record) -> Result<(), Failure>,
    {
        let caller = Location::caller();
        self.reporter.helper();
        for record in &self.records {
            if check(record).is_ok() {
                self.reporter.error_at(caller, "matching record found");
            }
        }
    }

    /// Expect some record with string `key` equal to `exp`
    #[track_caller]
    pub fn expect_string(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_string(key, exp));
    }

    /// Expect no record with string `key` equal to `exp`
    #[track_caller]
    pub fn expect_no_string(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_string(key, exp));
    }

    /// Expect some record with string `key` containing `exp`
    #[track_caller]
    pub fn expect_string_contains(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_string_contains(key, exp));
    }

    /// Expect no record with string `key` containing `exp`
    #[track_caller]
    pub fn expect_no_string_contains(&self, key: &str, exp: &str) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_string_contains(key, exp));
    }

    /// Expect some record with boolean `key` equal to `exp`
    #[track_caller]
    pub fn expect_bool(&self, key: &str, exp: bool) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_bool(key, exp));
    }

    /// Expect no record with boolean `key` equal to `exp`
    #[track_caller]
    pub fn expect_no_bool(&self, key: &str, exp: bool) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_bool(key, exp));
    }

    /// Expect some record with numeric `key` equal to `exp`
    #[track_caller]
    pub fn expect_number(&self, key: &str, exp: f64) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_number(key, exp));
    }

    /// Expect no record with numeric `key` equal to `exp`
    #[track_caller]
    pub fn expect_no_number(&self, key: &str, exp: f64) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_number(key, exp));
    }

    /// Expect some record with `key` at the instant `exp`
    #[track_caller]
    pub fn expect_timestamp(&self, key: &str, exp: impl Into<DateTime<FixedOffset>>) {
        self.reporter.helper();
        let exp = exp.into();
        self.expect_exists(|r| r.check_timestamp(key, exp));
    }

    /// Expect no record with `key` at the instant `exp`
    #[track_caller]
    pub fn expect_no_timestamp(&self, key: &str, exp: impl Into<DateTime<FixedOffset>>) {
        self.reporter.helper();
        let exp = exp.into();
        self.expect_none_exists(|r| r.check_timestamp(key, exp));
    }

    /// Expect some record with duration `key` equal to `exp`
    #[track_caller]
    pub fn expect_duration(&self, key: &str, exp: Duration) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_duration(key, exp));
    }

    /// Expect no record with duration `key` equal to `exp`
    #[track_caller]
    pub fn expect_no_duration(&self, key: &str, exp: Duration) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_duration(key, exp));
    }

    /// Expect some record with message `exp`
    #[track_caller]
    pub fn expect_message(&self, exp: &str) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_message(exp));
    }

    /// Expect no record with message `exp`
    #[track_caller]
    pub fn expect_no_message(&self, exp: &str) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_message(exp));
    }

    /// Expect some record with error `exp`
    #[track_caller]
    pub fn expect_error_message(&self, exp: &str) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_error_message(exp));
    }

    /// Expect no record with error `exp`
    #[track_caller]
    pub fn expect_no_error_message(&self, exp: &str) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_error_message(exp));
    }

    /// Expect some record at level `exp`
    #[track_caller]
    pub fn expect_severity(&self, exp: Level) {
        self.reporter.helper();
        self.expect_exists(|r| r.check_severity(exp));
    }

    /// Expect no record at level `exp`
    #[track_caller]
    pub fn expect_no_severity(&self, exp: Level) {
        self.reporter.helper();
        self.expect_none_exists(|r| r.check_severity(exp));
    }

    /// Write every record to the test log.
    pub fn print(&self) {
        self.reporter.helper();
        self.reporter.log("records logged so far:");
        for record in &self.records {
            self.reporter.log(&format!("  {}", record.raw()));
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl std::fmt::Debug for RecordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.records).finish()
    }
}

/// English ordinal suffix for `n`. Nonpositive numbers get "th".
pub fn ordinal(n: i64) -> &'static str {
    if n <= 0 {
        return "th";
    }
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
#[path = "record_set_tests.rs"]
mod tests;
