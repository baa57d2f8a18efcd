use super::*;

/// Fixed-size, non-overlapping event-time windows aligned to multiples of
/// `size`.
///
/// Windows tile the timeline with no gaps and no overlap: every finite
/// timestamp belongs to exactly one window.
#[derive(Debug, Clone)]
pub struct TumblingWindows {
    size_ms: i64,
}

impl TumblingWindows {
    /// Create tumbling windows of the given `size`.
    ///
    /// A size that truncates to zero milliseconds (or overflows `i64`) is a
    /// configuration error, fatal at startup.
    pub fn of(size: Duration) -> Result<Self, EngineError> {
        let size_ms =
            i64::try_from(size.as_millis()).map_err(|_| EngineError::InvalidWindowSize(size))?;
        if size_ms <= 0 {
            return Err(EngineError::InvalidWindowSize(size));
        }
        Ok(Self { size_ms })
    }

    /// The window containing `timestamp`.
    pub fn assign(&self, timestamp: EventTime) -> TimeWindow {
        let start = timestamp - timestamp.rem_euclid(self.size_ms);
        TimeWindow::new(start, start + self.size_ms)
    }

    /// Window size in milliseconds.
    pub fn size_ms(&self) -> i64 {
        self.size_ms
    }
}
