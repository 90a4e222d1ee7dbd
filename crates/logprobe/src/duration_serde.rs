// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Serde helpers for the duration unit, written as `"<count><suffix>"`.
//!
//! Accepted suffixes are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.

use serde::{de, Deserialize, Deserializer, Serializer};
use std::time::Duration;

const UNITS: [(&str, u64); 7] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*duration))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).ok_or_else(|| de::Error::custom(format!("invalid duration unit '{text}'")))
}

/// Parse `"<count><suffix>"` into a non-zero duration.
pub(crate) fn parse(text: &str) -> Option<Duration> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (count, suffix) = text.split_at(split);
    let count: u64 = count.parse().ok()?;
    let (_, nanos) = UNITS.iter().find(|(name, _)| *name == suffix)?;
    let total = count.checked_mul(*nanos)?;
    (total > 0).then(|| Duration::from_nanos(total))
}

/// Format a duration with the largest suffix that divides it exactly.
pub(crate) fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    for (name, unit) in UNITS.iter().rev().filter(|(name, _)| *name != "µs") {
        let unit = u128::from(*unit);
        if nanos >= unit && nanos % unit == 0 {
            return format!("{}{}", nanos / unit, name);
        }
    }
    format!("{nanos}ns")
}

#[cfg(test)]
#[path = "duration_serde_tests.rs"]
mod tests;
