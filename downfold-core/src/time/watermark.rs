use super::*;

/// Minimum possible event time. Used as the initial "no watermark" sentinel.
pub const EVENT_TIME_MIN: EventTime = i64::MIN;

/// Maximum possible event time.
pub const EVENT_TIME_MAX: EventTime = i64::MAX;

/// Tracks the maximum event timestamp observed across the stream.
///
/// The watermark is monotonically non-decreasing: an out-of-order event with
/// an earlier timestamp never pulls it backward. A window is eligible to
/// close once `window.end <= current()` — an event at or past the window end
/// proves the interval has fully elapsed. There is no wall-clock fallback;
/// a quiet stream leaves its last window open until a later event arrives.
#[derive(Debug, Clone)]
pub struct WatermarkClock {
    current: EventTime,
}

impl WatermarkClock {
    pub fn new() -> Self {
        Self {
            current: EVENT_TIME_MIN,
        }
    }

    /// Advance to `event_time` if it is ahead of the current watermark.
    ///
    /// Returns the new watermark when it moved, `None` when unchanged.
    pub fn advance(&mut self, event_time: EventTime) -> Option<Watermark> {
        if event_time > self.current {
            self.current = event_time;
            Some(Watermark::new(self.current))
        } else {
            None
        }
    }

    /// The current watermark timestamp.
    pub fn current(&self) -> EventTime {
        self.current
    }

    /// Whether a window with the given exclusive `end` is covered by the
    /// watermark and may close.
    pub fn is_due(&self, end: EventTime) -> bool {
        end <= self.current
    }
}

impl Default for WatermarkClock {
    fn default() -> Self {
        Self::new()
    }
}
