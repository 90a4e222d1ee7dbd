// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Failure reporting capability.
//!
//! Assertions never fail on their own; they hand failures to a [`Reporter`].
//! [`TestReporter`] adapts the capability to `cargo test`, and
//! [`RecordingReporter`] records every call for inspection.
//!
//! Assertions are `#[track_caller]` and pass their call site to the `*_at`
//! methods. Those default to the plain calls; [`TestReporter`] prefixes each
//! failure with `file:line` of the assertion.

use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Call site of the assertion that raised a failure
pub type Caller = &'static Location<'static>;

/// The subset of a test harness the assertions need
pub trait Reporter: Send + Sync {
    /// Report a failure and let the test continue.
    fn error(&self, msg: &str);

    /// Formatted variant of [`Reporter::error`].
    fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.error(&args.to_string());
    }

    /// Report a failure that ends the current test.
    fn fatal(&self, msg: &str);

    /// Formatted variant of [`Reporter::fatal`].
    fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.fatal(&args.to_string());
    }

    /// Mark the calling assertion as a helper frame.
    fn helper(&self) {}

    /// Write a line to the test log.
    fn log(&self, msg: &str);

    /// [`Reporter::error`] raised by the assertion at `caller`.
    fn error_at(&self, caller: Caller, msg: &str) {
        let _ = caller;
        self.error(msg);
    }

    /// [`Reporter::error_fmt`] raised by the assertion at `caller`.
    fn error_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        let _ = caller;
        self.error_fmt(args);
    }

    /// [`Reporter::fatal`] raised by the assertion at `caller`.
    fn fatal_at(&self, caller: Caller, msg: &str) {
        let _ = caller;
        self.fatal(msg);
    }

    /// [`Reporter::fatal_fmt`] raised by the assertion at `caller`.
    fn fatal_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        let _ = caller;
        self.fatal_fmt(args);
    }
}

fn located(caller: Caller, msg: &str) -> String {
    format!("{}:{}: {msg}", caller.file(), caller.line())
}

/// Reporter for `cargo test`.
///
/// Non-fatal failures are printed and collected; once the last handle is
/// dropped the test panics with all of them. Fatal failures panic at once.
/// Failures raised by assertions start with the assertion's `file:line`.
///
/// Handles live in the [`Sink`](crate::Sink) and the records decoded from
/// it, never in its writers, so the panic fires when the test drops them.
#[derive(Clone, Default)]
pub struct TestReporter {
    failures: Arc<Mutex<Vec<String>>>,
}

impl TestReporter {
    /// Create a reporter with no recorded failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures reported so far
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    /// Forget recorded failures
    pub fn clear(&self) {
        self.failures.lock().clear();
    }
}

impl Reporter for TestReporter {
    fn error(&self, msg: &str) {
        eprintln!("logprobe: {msg}");
        self.failures.lock().push(msg.to_string());
    }

    #[allow(clippy::panic)]
    fn fatal(&self, msg: &str) {
        let mut failures = self.failures.lock();
        let earlier = std::mem::take(&mut *failures);
        drop(failures);
        if earlier.is_empty() {
            panic!("{msg}");
        }
        panic!("{msg}\nearlier failures:\n  {}", earlier.join("\n  "));
    }

    fn log(&self, msg: &str) {
        println!("{msg}");
    }

    fn error_at(&self, caller: Caller, msg: &str) {
        self.error(&located(caller, msg));
    }

    fn error_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        self.error(&located(caller, &args.to_string()));
    }

    fn fatal_at(&self, caller: Caller, msg: &str) {
        self.fatal(&located(caller, msg));
    }

    fn fatal_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        self.fatal(&located(caller, &args.to_string()));
    }
}

impl Drop for TestReporter {
    #[allow(clippy::panic)]
    fn drop(&mut self) {
        if Arc::strong_count(&self.failures) > 1 || std::thread::panicking() {
            return;
        }
        let failures = std::mem::take(&mut *self.failures.lock());
        if !failures.is_empty() {
            panic!(
                "{} log assertion(s) failed:\n  {}",
                failures.len(),
                failures.join("\n  ")
            );
        }
    }
}

/// A single call made to a [`RecordingReporter`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    /// Non-fatal failure
    Error(String),
    /// Formatted non-fatal failure
    ErrorFmt(String),
    /// Failure ending the test
    Fatal(String),
    /// Formatted failure ending the test
    FatalFmt(String),
    /// Helper mark
    Helper,
    /// Test log line
    Log(String),
}

impl Report {
    /// Whether this call reports a failure
    pub fn is_failure(&self) -> bool {
        !matches!(self, Report::Helper | Report::Log(_))
    }
}

/// Reporter that records every call in order. Clones share the record.
///
/// Call sites passed to the `*_at` methods are kept apart from the reports.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<Report>>>,
    callers: Arc<Mutex<Vec<Caller>>>,
}

impl RecordingReporter {
    /// Create an empty recording reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order
    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().clone()
    }

    /// Failure reports only, without helper marks and log lines
    pub fn failures(&self) -> Vec<Report> {
        self.reports
            .lock()
            .iter()
            .filter(|r| r.is_failure())
            .cloned()
            .collect()
    }

    /// Log lines only
    pub fn logs(&self) -> Vec<String> {
        self.reports
            .lock()
            .iter()
            .filter_map(|r| match r {
                Report::Log(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of helper marks
    pub fn helper_calls(&self) -> usize {
        self.reports
            .lock()
            .iter()
            .filter(|r| matches!(r, Report::Helper))
            .count()
    }

    /// Call sites of located failures, in order
    pub fn callers(&self) -> Vec<Caller> {
        self.callers.lock().clone()
    }

    /// Forget all recorded calls
    pub fn clear(&self) {
        self.reports.lock().clear();
        self.callers.lock().clear();
    }

    fn push(&self, report: Report) {
        self.reports.lock().push(report);
    }
}

impl Reporter for RecordingReporter {
    fn error(&self, msg: &str) {
        self.push(Report::Error(msg.to_string()));
    }

    fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.push(Report::ErrorFmt(args.to_string()));
    }

    fn fatal(&self, msg: &str) {
        self.push(Report::Fatal(msg.to_string()));
    }

    fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.push(Report::FatalFmt(args.to_string()));
    }

    fn helper(&self) {
        self.push(Report::Helper);
    }

    fn log(&self, msg: &str) {
        self.push(Report::Log(msg.to_string()));
    }

    fn error_at(&self, caller: Caller, msg: &str) {
        self.callers.lock().push(caller);
        self.error(msg);
    }

    fn error_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        self.callers.lock().push(caller);
        self.error_fmt(args);
    }

    fn fatal_at(&self, caller: Caller, msg: &str) {
        self.callers.lock().push(caller);
        self.fatal(msg);
    }

    fn fatal_fmt_at(&self, caller: Caller, args: fmt::Arguments<'_>) {
        self.callers.lock().push(caller);
        self.fatal_fmt(args);
    }
}

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;
