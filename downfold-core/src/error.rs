use std::time::Duration;

use thiserror::Error;

/// Failures produced by the aggregation engine.
///
/// Everything except [`InvalidWindowSize`](EngineError::InvalidWindowSize)
/// is a per-record failure: the caller logs it with the offending payload,
/// drops the record, and the stream continues.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configured time field is absent from the record.
    #[error("time field `{field}` missing from record")]
    MissingTimeField { field: String },

    /// The time field exists but does not parse as a timestamp.
    #[error("time field `{field}` value `{value}` does not parse with format `{format}`")]
    MalformedTimestamp {
        field: String,
        value: String,
        format: String,
    },

    /// The configured data field is absent or not numeric.
    #[error("data field `{field}` missing or not numeric")]
    MalformedValue { field: String },

    /// Window size must be a positive number of milliseconds. Fatal at
    /// startup.
    #[error("window size must be a positive number of milliseconds, got {0:?}")]
    InvalidWindowSize(Duration),
}

impl EngineError {
    /// True for errors that drop a single record and leave the stream
    /// running.
    pub fn is_record_error(&self) -> bool {
        !matches!(self, EngineError::InvalidWindowSize(_))
    }
}
