use std::time::Duration;

use crate::error::EngineError;
use crate::types::EventTime;

mod assigner;
mod primitives;

pub use assigner::*;
pub use primitives::*;

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
