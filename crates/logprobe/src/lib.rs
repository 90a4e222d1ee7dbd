// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log capture and assertions for tests.
//!
//! A [`Sink`] is handed to a logger as its output. It keeps every
//! newline-delimited JSON record written to it, and tests query it for
//! [`Record`]s and [`RecordSet`]s to assert on fields. Failed assertions go
//! to a [`Reporter`] instead of panicking on the spot.
//!
//! ```no_run
//! use logprobe::{Level, Sink};
//!
//! let sink = Sink::tracing();
//! tracing::subscriber::with_default(sink.subscriber(), || {
//!     tracing::warn!(attempt = 3, "retrying");
//! });
//!
//! let records = sink.records();
//! records.expect_length(1);
//! records.expect_message("retrying");
//! records.expect_number("attempt", 3.0);
//! sink.filter(Level::Warn).expect_length(1);
//! ```

mod config;
mod duration_serde;
mod error;
mod record;
mod record_set;
mod reporter;
mod sink;

pub use config::{FormatConfig, Level, LevelCase, TimeFormat};
pub use error::{ConfigError, DecodeError};
pub use record::{Failure, KeyStatus, Record};
pub use record_set::{ordinal, RecordSet};
pub use reporter::{Caller, RecordingReporter, Report, Reporter, TestReporter};
pub use sink::{Sink, SinkWriter};
