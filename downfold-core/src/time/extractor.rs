use super::*;

/// Default time field format: ISO-8601 without zone, optional fractional
/// seconds, interpreted as UTC.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parses the application-level time field out of a [`Record`].
///
/// Event time drives all windowing decisions instead of arrival order, so a
/// record without a usable time field carries no position in the stream and
/// is dropped by the caller.
#[derive(Debug, Clone)]
pub struct TimestampExtractor {
    field: String,
    format: String,
}

impl TimestampExtractor {
    pub fn new(field: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            format: format.into(),
        }
    }

    /// Extractor using [`DEFAULT_TIME_FORMAT`].
    pub fn for_field(field: impl Into<String>) -> Self {
        Self::new(field, DEFAULT_TIME_FORMAT)
    }

    /// Name of the time field this extractor reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Extract the event time in epoch milliseconds.
    ///
    /// Text values parse with the configured format first, then as RFC 3339
    /// for inputs carrying an explicit offset or `Z`. Numeric values pass
    /// through as epoch milliseconds already.
    pub fn extract(&self, record: &Record) -> Result<EventTime, EngineError> {
        let value = record.get(&self.field).ok_or_else(|| EngineError::MissingTimeField {
            field: self.field.clone(),
        })?;
        match value {
            FieldValue::Text(text) => self.parse_text(text),
            FieldValue::Int(ms) => Ok(*ms),
            FieldValue::Float(ms) => Ok(*ms as EventTime),
            other => Err(EngineError::MalformedTimestamp {
                field: self.field.clone(),
                value: format!("{other:?}"),
                format: self.format.clone(),
            }),
        }
    }

    fn parse_text(&self, text: &str) -> Result<EventTime, EngineError> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, &self.format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
        if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
            return Ok(zoned.timestamp_millis());
        }
        Err(EngineError::MalformedTimestamp {
            field: self.field.clone(),
            value: text.to_string(),
            format: self.format.clone(),
        })
    }
}
