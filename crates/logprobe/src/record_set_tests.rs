// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::reporter::{RecordingReporter, Report};
use crate::sink::Sink;
use chrono::{TimeZone, Utc};
use rstest::rstest;

fn make_sink(lines: &[&str]) -> (Sink, RecordingReporter) {
    let reporter = RecordingReporter::new();
    let sink = Sink::new(reporter.clone());
    for line in lines {
        sink.write_line(line);
    }
    (sink, reporter)
}

fn three_records() -> (Sink, RecordingReporter) {
    make_sink(&[
        r#"{"level":"error","key0":0,"message":"message0"}"#,
        r#"{"level":"error","key1.1":1,"key1.2":true,"message":"message1"}"#,
        r#"{"level":"error","key2":2.2,"message":"message2"}"#,
    ])
}

fn no_match() -> Vec<Report> {
    vec![Report::Error("no matching record found".to_string())]
}

#[test]
fn test_three_records_scenario() {
    let (sink, reporter) = three_records();

    let records = sink.records();
    assert_eq!(records.get().len(), 3);
    records.expect_number("key2", 2.2);
    records.expect_length(3);
    assert!(reporter.failures().is_empty());

    records.expect_length(4);
    assert_eq!(
        reporter.failures(),
        vec![Report::ErrorFmt("expected 4 records got 3".to_string())]
    );
}

#[test]
fn test_sugar_finds_any_record() {
    let (sink, reporter) = three_records();

    let records = sink.records();
    records.expect_number("key2", 2.2);
    records.expect_number("key0", 0.0);
    records.expect_message("message1");
    records.expect_number("key1.1", 1.0);
    records.expect_bool("key1.2", true);
    records.expect_message("message0");
    records.expect_severity(Level::Error);

    assert!(reporter.failures().is_empty());
}

#[test]
fn test_at_returns_indexed_record() {
    let (sink, reporter) = three_records();
    let records = sink.records();

    let record = records.at(0).unwrap();
    record.expect_number("key0", 0.0);

    let record = records.at(1).unwrap();
    record.expect_number("key1.1", 1.0);
    record.expect_bool("key1.2", true);
    record.expect_message("message1");

    let record = records.at(2).unwrap();
    record.expect_number("key2", 2.2);
    record.expect_message("message2");

    assert!(reporter.failures().is_empty());
}

#[test]
fn test_at_out_of_range_is_fatal() {
    let (sink, reporter) = three_records();

    let records = sink.records();
    let record = records.at(3);

    assert!(record.is_none());
    assert_eq!(
        reporter.failures(),
        vec![Report::FatalFmt(
            "expected 3rd logged record to exist".to_string()
        )]
    );
}

#[test]
fn test_at_on_empty_set() {
    let (sink, reporter) = make_sink(&[]);
    assert!(sink.records().at(0).is_none());
    assert_eq!(
        reporter.failures(),
        vec![Report::FatalFmt(
            "expected 0th logged record to exist".to_string()
        )]
    );
}

#[rstest]
#[case(-1, "th")]
#[case(0, "th")]
#[case(1, "st")]
#[case(2, "nd")]
#[case(3, "rd")]
#[case(4, "th")]
#[case(10, "th")]
#[case(11, "th")]
#[case(12, "th")]
#[case(13, "th")]
#[case(21, "st")]
#[case(22, "nd")]
#[case(23, "rd")]
#[case(101, "st")]
#[case(111, "th")]
#[case(112, "th")]
#[case(1003, "rd")]
fn test_ordinal(#[case] n: i64, #[case] expected: &str) {
    assert_eq!(ordinal(n), expected);
}

#[test]
fn test_expect_length_mismatch() {
    let (sink, reporter) = make_sink(&[r#"{"level":"error","key0":0}"#]);
    sink.records().expect_length(3);
    assert_eq!(
        reporter.failures(),
        vec![Report::ErrorFmt("expected 3 records got 1".to_string())]
    );
}

#[test]
fn test_expect_exists_stops_at_first_match() {
    let (sink, reporter) = make_sink(&[r#"{"k":"A"}"#, r#"{"k":"B"}"#, r#"{"k":"C"}"#]);
    let mut seen = Vec::new();

    sink.records().expect_exists(|r| {
        let (value, _) = r.as_string("k");
        seen.push(value);
        r.check_string("k", "B")
    });

    assert_eq!(seen, vec!["A".to_string(), "B".to_string()]);
    assert!(reporter.failures().is_empty());
}

#[test]
fn test_expect_exists_reports_once_without_match() {
    let (sink, reporter) = make_sink(&[r#"{"k":"A"}"#, r#"{"k":"B"}"#, r#"{"k":"C"}"#]);
    sink.records().expect_exists(|r| r.check_string("k", "D"));
    assert_eq!(reporter.failures(), no_match());
}

#[test]
fn test_expect_none_exists_reports_every_match() {
    let (sink, reporter) = make_sink(&[r#"{"k":"X"}"#, r#"{"k":"B"}"#, r#"{"k":"X"}"#]);
    let mut calls = 0;

    sink.records().expect_none_exists(|r| {
        calls += 1;
        r.check_string("k", "X")
    });

    assert_eq!(calls, 3);
    assert_eq!(
        reporter.failures(),
        vec![
            Report::Error("matching record found".to_string()),
            Report::Error("matching record found".to_string()),
        ]
    );
}

#[test]
fn test_expect_bool_on_empty_set() {
    let (sink, reporter) = make_sink(&[]);
    sink.records().expect_bool("key1", false);
    assert_eq!(reporter.failures(), no_match());
}

#[test]
fn test_expect_bool_found_and_not_found() {
    let (sink, reporter) = make_sink(&[
        r#"{"level":"error","key":true}"#,
        r#"{"level":"error","key":true}"#,
    ]);
    sink.records().expect_bool("key", true);
    assert!(reporter.failures().is_empty());

    sink.records().expect_bool("key", false);
    assert_eq!(reporter.failures(), no_match());
}

#[test]
fn test_expect_no_bool() {
    let (sink, reporter) = make_sink(&[r#"{"key":true}"#, r#"{"key":false}"#]);
    sink.records().expect_no_bool("other", true);
    assert!(reporter.failures().is_empty());

    sink.records().expect_no_bool("key", false);
    assert_eq!(
        reporter.failures(),
        vec![Report::Error("matching record found".to_string())]
    );
}

#[rstest]
#[case("key0", "val0", true)]
#[case("key1", "val1", true)]
#[case("key2", "val2", true)]
#[case("key1", "val", false)]
#[case("key", "val0", false)]
fn test_expect_string(#[case] key: &str, #[case] exp: &str, #[case] found: bool) {
    let (sink, reporter) = make_sink(&[
        r#"{"level":"error","key0":"val0"}"#,
        r#"{"level":"error","key1":"val1"}"#,
        r#"{"level":"error","key2":"val2"}"#,
    ]);

    sink.records().expect_string(key, exp);

    if found {
        assert!(reporter.failures().is_empty());
    } else {
        assert_eq!(reporter.failures(), no_match());
    }
}

#[test]
fn test_expect_no_string() {
    let (sink, reporter) = make_sink(&[
        r#"{"key0":"val0"}"#,
        r#"{"key1":"val1"}"#,
        r#"{"key2":"val2"}"#,
    ]);
    sink.records().expect_no_string("key", "val0");
    assert!(reporter.failures().is_empty());

    sink.records().expect_no_string("key1", "val1");
    assert_eq!(
        reporter.failures(),
        vec![Report::Error("matching record found".to_string())]
    );
}

#[test]
fn test_expect_string_contains() {
    let (sink, reporter) = make_sink(&[r#"{"path":"/api/v1/users"}"#, r#"{"path":"/health"}"#]);
    sink.records().expect_string_contains("path", "users");
    sink.records().expect_no_string_contains("path", "admin");
    assert!(reporter.failures().is_empty());

    sink.records().expect_string_contains("path", "admin");
    sink.records().expect_no_string_contains("path", "/");
    assert_eq!(
        reporter.failures(),
        vec![
            Report::Error("no matching record found".to_string()),
            Report::Error("matching record found".to_string()),
            Report::Error("matching record found".to_string()),
        ]
    );
}

#[test]
fn test_expect_number() {
    let (sink, reporter) = make_sink(&[
        r#"{"key":1.23}"#,
        r#"{"key":0}"#,
        r#"{"key":42}"#,
        r#"{"key":-1}"#,
    ]);
    sink.records().expect_number("key", 1.23);
    sink.records().expect_number("key", 42.0);
    sink.records().expect_no_number("key", 7.0);
    assert!(reporter.failures().is_empty());

    sink.records().expect_number("key", 1.22);
    sink.records().expect_no_number("key", -1.0);
    assert_eq!(
        reporter.failures(),
        vec![
            Report::Error("no matching record found".to_string()),
            Report::Error("matching record found".to_string()),
        ]
    );
}

#[test]
fn test_expect_timestamp() {
    let exp = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    let (sink, reporter) = make_sink(&[
        r#"{"key":"2026-10-18T08:59:59Z"}"#,
        r#"{"key":"2026-10-18T11:00:00+02:00"}"#,
        r#"{"key":"2026-10-18T09:00:01Z"}"#,
    ]);
    sink.records().expect_timestamp("key", exp);
    assert!(reporter.failures().is_empty());

    sink.records()
        .expect_timestamp("key", exp + chrono::TimeDelta::seconds(5));
    sink.records().expect_no_timestamp("key", exp);
    assert_eq!(
        reporter.failures(),
        vec![
            Report::Error("no matching record found".to_string()),
            Report::Error("matching record found".to_string()),
        ]
    );
}

#[test]
fn test_expect_duration() {
    let (sink, reporter) = make_sink(&[
        r#"{"key":43000}"#,
        r#"{"key":"2026-10-18T09:00:00Z"}"#,
        r#"{"key":42000}"#,
    ]);
    sink.records().expect_duration("key", Duration::from_secs(42));
    sink.records().expect_no_duration("key", Duration::from_secs(44));
    assert!(reporter.failures().is_empty());

    sink.records().expect_duration("key", Duration::from_secs(41));
    assert_eq!(reporter.failures(), no_match());
}

#[test]
fn test_expect_message_and_error() {
    let (sink, reporter) = make_sink(&[
        r#"{"level":"info","message":"connecting"}"#,
        r#"{"level":"error","message":"failed","error":"refused"}"#,
    ]);
    let records = sink.records();
    records.expect_message("failed");
    records.expect_error_message("refused");
    records.expect_no_message("message");
    records.expect_no_error_message("timeout");
    assert!(reporter.failures().is_empty());

    records.expect_error_message("timeout");
    records.expect_no_message("connecting");
    assert_eq!(
        reporter.failures(),
        vec![
            Report::Error("no matching record found".to_string()),
            Report::Error("matching record found".to_string()),
        ]
    );
}

#[test]
fn test_expect_severity() {
    let (sink, reporter) = make_sink(&[r#"{"level":"info"}"#, r#"{"level":"debug"}"#]);
    sink.records().expect_severity(Level::Debug);
    sink.records().expect_no_severity(Level::Error);
    assert!(reporter.failures().is_empty());

    sink.records().expect_severity(Level::Warn);
    assert_eq!(reporter.failures(), no_match());
}

#[test]
fn test_filter_keeps_order() {
    let (sink, _) = make_sink(&[
        r#"{"level":"info","n":1}"#,
        r#"{"level":"error","n":2}"#,
        r#"{"level":"info","n":3}"#,
    ]);
    let info = sink.records().filter(Level::Info);
    let ns: Vec<f64> = info.iter().map(|r| r.as_number("n").0).collect();
    assert_eq!(ns, vec![1.0, 3.0]);
}

#[test]
fn test_print_logs_banner_and_raw_records() {
    let (sink, reporter) = make_sink(&[
        r#"{"level":"error","key0":"val0"}"#,
        r#"{"level":"error","key1":"val1"}"#,
    ]);

    sink.records().print();

    assert_eq!(
        reporter.logs(),
        vec![
            "records logged so far:".to_string(),
            r#"  {"level":"error","key0":"val0"}"#.to_string(),
            r#"  {"level":"error","key1":"val1"}"#.to_string(),
        ]
    );
    assert!(reporter.failures().is_empty());
}

#[test]
fn test_iteration_and_accessors() {
    let (sink, _) = three_records();
    let records = sink.records();

    assert_eq!(records.len(), 3);
    assert!(!records.is_empty());
    assert_eq!(records.first().unwrap().as_number("key0").0, 0.0);
    assert_eq!(records.last().unwrap().as_number("key2").0, 2.2);
    assert_eq!((&records).into_iter().count(), 3);
    assert!(format!("{records:?}").starts_with("[Record { raw: "));
}

#[test]
fn test_assertions_mark_helper() {
    let (sink, reporter) = three_records();
    sink.records().expect_length(3);
    sink.records().expect_message("message2");
    assert!(reporter.helper_calls() >= 2);
}

#[test]
fn test_failures_point_at_the_calling_line() {
    let (sink, reporter) = three_records();
    let records = sink.records();

    let line = line!() + 1;
    records.expect_message("missing");
    records.expect_no_severity(Level::Error);
    records.expect_length(4);
    records.at(3);

    let callers = reporter.callers();
    assert_eq!(callers.len(), 6);
    assert!(callers.iter().all(|c| c.file() == file!()));
    let lines: Vec<u32> = callers.iter().map(|c| c.line()).collect();
    assert_eq!(
        lines,
        vec![line, line + 1, line + 1, line + 1, line + 2, line + 3]
    );
}
