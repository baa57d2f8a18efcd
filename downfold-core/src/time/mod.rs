use chrono::{DateTime, NaiveDateTime};

use crate::error::EngineError;
use crate::types::{EventTime, FieldValue, Record, Watermark};

mod extractor;
mod watermark;

pub use extractor::*;
pub use watermark::*;

#[cfg(test)]
#[path = "tests/time_tests.rs"]
mod tests;
