//! Running aggregate state for open windows.

use ahash::AHashMap;

use crate::types::EventTime;
use crate::window::TimeWindow;

/// Mutable running aggregate for one open window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulator {
    pub count: u64,
    pub sum: f64,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    /// Arithmetic mean of the folded values.
    ///
    /// An accumulator only exists after its first update, so `count >= 1`
    /// and the division is always defined.
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Holds one [`Accumulator`] per open window.
///
/// Owned exclusively by the engine and mutated only through [`update`] and
/// [`remove`](Self::remove); closed windows are removed synchronously with
/// emission, so the store never retains more than the open set.
///
/// [`update`]: Self::update
#[derive(Debug, Default)]
pub struct AggregateStore {
    accumulators: AHashMap<TimeWindow, Accumulator>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `value` into the accumulator for `window`, creating it with
    /// count 0 / sum 0 on first update.
    pub fn update(&mut self, window: TimeWindow, value: f64) {
        self.accumulators
            .entry(window)
            .or_insert(Accumulator { count: 0, sum: 0.0 })
            .add(value);
    }

    /// Point-in-time `(count, sum)` for `window` without mutating.
    pub fn snapshot(&self, window: &TimeWindow) -> Option<(u64, f64)> {
        self.accumulators.get(window).map(|acc| (acc.count, acc.sum))
    }

    /// Delete and return the accumulator for `window`.
    pub fn remove(&mut self, window: &TimeWindow) -> Option<Accumulator> {
        self.accumulators.remove(window)
    }

    /// Open windows whose interval has fully elapsed (`end <= watermark`),
    /// ascending by start so emission order is deterministic.
    pub fn expired(&self, watermark: EventTime) -> Vec<TimeWindow> {
        let mut due: Vec<TimeWindow> = self
            .accumulators
            .keys()
            .filter(|w| w.end <= watermark)
            .copied()
            .collect();
        due.sort();
        due
    }

    /// Number of currently open windows.
    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }
}
