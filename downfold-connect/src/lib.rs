//! # Downfold Connect
//!
//! External-facing adapters for the downfold pipeline:
//!
//! - [`codec`] — transport envelope and JSON record codec.
//! - [`kafka`] — consumer/producer wrappers over rdkafka.
//! - [`influx`] — InfluxDB v3 HTTP client and line protocol points.
//! - [`source`] — periodic query source feeding the record stream.
//! - [`sink`] — time-series sink persisting closed-window summaries.

pub mod codec;
pub mod error;
pub mod influx;
pub mod kafka;
pub mod sink;
pub mod source;
