//! # Downfold Core
//!
//! The windowed aggregation engine behind the downfold telemetry
//! downsampler.
//!
//! This crate provides the transport-agnostic core:
//!
//! - [`types`] — stream data types: [`Record`](types::Record),
//!   [`FieldValue`](types::FieldValue), [`Watermark`](types::Watermark),
//!   [`OutputRecord`](types::OutputRecord).
//! - [`time`] — event-time extraction and the watermark clock.
//! - [`window`] — tumbling window primitives and assignment.
//! - [`state`] — per-window running accumulators.
//! - [`engine`] — the single-owner aggregation core tying it together.

pub mod engine;
pub mod error;
pub mod state;
pub mod time;
pub mod types;
pub mod window;
