// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture sink implementation.

use crate::config::{FormatConfig, Level};
use crate::error::DecodeError;
use crate::record::Record;
use crate::record_set::RecordSet;
use crate::reporter::{Reporter, TestReporter};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

struct State {
    buf: Vec<u8>,
    config: Arc<FormatConfig>,
}

/// Write side of a sink. Writers share only this, never the reporter.
struct Buffer {
    state: RwLock<State>,
    writes: AtomicUsize,
}

impl Buffer {
    fn append(&self, bytes: &[u8]) -> usize {
        let mut state = self.state.write();
        state.buf.extend_from_slice(bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        bytes.len()
    }
}

/// Log destination that keeps everything written to it.
///
/// Every query decodes the live buffer again, so results always include the
/// latest writes. Clones share the buffer.
pub struct Sink {
    buffer: Arc<Buffer>,
    reporter: Arc<dyn Reporter>,
}

impl Sink {
    /// Create a sink reporting to `reporter` with the default format
    pub fn new<R: Reporter + 'static>(reporter: R) -> Self {
        Self::with_config(reporter, FormatConfig::default())
    }

    /// Create a sink reporting to `reporter` with an explicit format
    pub fn with_config<R: Reporter + 'static>(reporter: R, config: FormatConfig) -> Self {
        Self {
            buffer: Arc::new(Buffer {
                state: RwLock::new(State {
                    buf: Vec::new(),
                    config: Arc::new(config),
                }),
                writes: AtomicUsize::new(0),
            }),
            reporter: Arc::new(reporter),
        }
    }

    /// Create a sink that fails the current `cargo test` on failed assertions
    pub fn for_test() -> Self {
        Self::new(TestReporter::new())
    }

    /// Like [`Sink::for_test`], decoding the layout of [`Sink::subscriber`]
    pub fn tracing() -> Self {
        Self::with_config(TestReporter::new(), FormatConfig::tracing_json())
    }

    /// Format in effect for the next decode
    pub fn config(&self) -> Arc<FormatConfig> {
        Arc::clone(&self.buffer.state.read().config)
    }

    /// Replace the format used by later decodes
    pub fn set_config(&self, config: FormatConfig) {
        self.buffer.state.write().config = Arc::new(config);
    }

    /// A writer appending to this sink.
    ///
    /// The writer shares the buffer only; it may outlive the sink.
    pub fn writer(&self) -> SinkWriter {
        SinkWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }

    /// Append one record's bytes. Counts as a single write.
    pub fn write_bytes(&self, bytes: &[u8]) -> usize {
        self.buffer.append(bytes)
    }

    /// Append `line` and a newline as a single write
    pub fn write_line(&self, line: &str) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.write_bytes(&bytes);
    }

    /// Number of writes since creation or the last reset
    pub fn len(&self) -> usize {
        self.buffer.writes.load(Ordering::SeqCst)
    }

    /// Check if nothing was written
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Everything written so far, as text
    pub fn snapshot(&self) -> String {
        String::from_utf8_lossy(&self.buffer.state.read().buf).into_owned()
    }

    /// Decode every record written so far.
    ///
    /// A malformed record is reported as fatal and yields an empty set.
    #[track_caller]
    pub fn records(&self) -> RecordSet {
        let caller = Location::caller();
        let (buf, config) = self.view();
        match decode(&buf, &config, &self.reporter) {
            Ok(records) => {
                tracing::trace!(
                    records = records.len(),
                    bytes = buf.len(),
                    "decoded capture buffer"
                );
                RecordSet::new(records, Arc::clone(&self.reporter))
            }
            Err(err) => {
                tracing::debug!(error = %err, "capture buffer holds a malformed record");
                self.reporter.fatal_at(caller, &err.to_string());
                RecordSet::new(Vec::new(), Arc::clone(&self.reporter))
            }
        }
    }

    /// Records whose severity is `level`, in write order
    #[track_caller]
    pub fn filter(&self, level: Level) -> RecordSet {
        self.records().filter(level)
    }

    /// First record, if any
    #[track_caller]
    pub fn first_record(&self) -> Option<Record> {
        self.records().first().cloned()
    }

    /// Last record, if any
    #[track_caller]
    pub fn last_record(&self) -> Option<Record> {
        self.records().last().cloned()
    }

    /// Drop everything written so far. Earlier record sets are unaffected.
    pub fn reset(&self) {
        {
            let mut state = self.buffer.state.write();
            state.buf.clear();
            self.buffer.writes.store(0, Ordering::SeqCst);
        }
        tracing::trace!("capture buffer reset");
    }

    /// Subscriber writing `tracing` events into this sink as JSON lines.
    ///
    /// Event fields sit at the top level of each record, next to `timestamp`,
    /// `level`, `message` and `target`; decode them with
    /// [`FormatConfig::tracing_json`]. Events from this crate are left out.
    /// The subscriber only holds a [`SinkWriter`], so it can be installed as
    /// the global default without keeping the reporter alive.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::Layer;

        let layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(self.writer())
            .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                !meta.target().starts_with(env!("CARGO_CRATE_NAME"))
            }));
        tracing_subscriber::registry().with(layer)
    }

    /// Copy the buffer and config under one read lock.
    fn view(&self) -> (Vec<u8>, Arc<FormatConfig>) {
        let state = self.buffer.state.read();
        (state.buf.clone(), Arc::clone(&state.config))
    }
}

/// Split `buf` into JSON objects, keeping each object's source text.
fn decode(
    buf: &[u8],
    config: &Arc<FormatConfig>,
    reporter: &Arc<dyn Reporter>,
) -> Result<Vec<Record>, DecodeError> {
    let mut records = Vec::new();
    let mut stream = serde_json::Deserializer::from_slice(buf).into_iter::<Map<String, Value>>();
    let mut start = 0;
    while let Some(next) = stream.next() {
        let fields = next.map_err(|source| DecodeError::Malformed {
            index: records.len(),
            source,
        })?;
        let end = stream.byte_offset();
        let raw = String::from_utf8_lossy(&buf[start..end]).trim().to_string();
        start = end;
        records.push(Record::new(
            raw,
            fields,
            Arc::clone(config),
            Arc::clone(reporter),
        ));
    }
    Ok(records)
}

impl Default for Sink {
    fn default() -> Self {
        Self::for_test()
    }
}

impl Clone for Sink {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            reporter: Arc::clone(&self.reporter),
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.snapshot())
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("writes", &self.len()).finish()
    }
}

/// Writer handle for a [`Sink`]. Never fails. Clones share the buffer.
#[derive(Clone)]
pub struct SinkWriter {
    buffer: Arc<Buffer>,
}

impl fmt::Debug for SinkWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkWriter")
            .field("writes", &self.buffer.writes.load(Ordering::SeqCst))
            .finish()
    }
}

impl io::Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.buffer.append(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
