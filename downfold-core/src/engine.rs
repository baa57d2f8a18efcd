//! The single-owner aggregation core.

use tracing::warn;

use crate::error::EngineError;
use crate::state::AggregateStore;
use crate::time::{TimestampExtractor, WatermarkClock};
use crate::types::{EventTime, OutputRecord, Record};
use crate::window::TumblingWindows;

/// Windowed mean over a single numeric field of the record stream.
///
/// Owns all mutable windowing state — the per-window accumulators and the
/// watermark — so callers feed records in arrival order from one task and
/// publish whatever comes back. Each closed window is returned exactly once
/// per process lifetime; its accumulator is discarded in the same step.
pub struct DownsampleEngine {
    extractor: TimestampExtractor,
    assigner: TumblingWindows,
    data_field: String,
    store: AggregateStore,
    clock: WatermarkClock,
}

impl DownsampleEngine {
    /// Create an engine aggregating `data_field` into the assigner's
    /// windows, with event time read by `extractor`.
    pub fn new(
        extractor: TimestampExtractor,
        assigner: TumblingWindows,
        data_field: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            assigner,
            data_field: data_field.into(),
            store: AggregateStore::new(),
            clock: WatermarkClock::new(),
        }
    }

    /// Fold one record and return the windows it closed, ascending by start.
    ///
    /// Errors are per-record: the caller logs the payload, drops the record,
    /// and keeps processing.
    pub fn process(&mut self, record: &Record) -> Result<Vec<OutputRecord>, EngineError> {
        let event_time = self.extractor.extract(record)?;
        let value = record
            .numeric(&self.data_field)
            .ok_or_else(|| EngineError::MalformedValue {
                field: self.data_field.clone(),
            })?;

        let window = self.assigner.assign(event_time);
        if self.clock.is_due(window.end) {
            // The window already closed and emitted; its identity is never
            // reused, so a late record cannot resurrect it.
            warn!(%window, event_time, "dropping late record for closed window");
            return Ok(Vec::new());
        }

        self.store.update(window, value);
        self.clock.advance(event_time);
        Ok(self.close_due_windows())
    }

    /// Snapshot, emit, and discard every window covered by the watermark.
    fn close_due_windows(&mut self) -> Vec<OutputRecord> {
        let mut emitted = Vec::new();
        for window in self.store.expired(self.clock.current()) {
            if let Some(acc) = self.store.remove(&window) {
                emitted.push(OutputRecord {
                    time: window.end,
                    field: self.data_field.clone(),
                    value: acc.mean(),
                });
            }
        }
        emitted
    }

    /// Current watermark timestamp.
    pub fn watermark(&self) -> EventTime {
        self.clock.current()
    }

    /// Number of windows still accumulating.
    pub fn open_windows(&self) -> usize {
        self.store.len()
    }

    /// Name of the aggregated field.
    pub fn data_field(&self) -> &str {
        &self.data_field
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
