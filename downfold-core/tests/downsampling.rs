use std::time::Duration;

use downfold_core::engine::DownsampleEngine;
use downfold_core::time::TimestampExtractor;
use downfold_core::types::{OutputRecord, Record};
use downfold_core::window::TumblingWindows;

fn reading(time: &str, value: f64) -> Record {
    Record::new()
        .with_field("time_recorded", time)
        .with_field("temperature", value)
}

#[test]
fn test_minute_downsampling_emits_single_summary() {
    let mut engine = DownsampleEngine::new(
        TimestampExtractor::for_field("time_recorded"),
        TumblingWindows::of(Duration::from_secs(60)).unwrap(),
        "temperature",
    );

    // Two readings inside the first minute: nothing closes.
    assert!(engine
        .process(&reading("1970-01-01T00:00:05.000000", 10.0))
        .unwrap()
        .is_empty());
    assert!(engine
        .process(&reading("1970-01-01T00:00:35.000000", 20.0))
        .unwrap()
        .is_empty());

    // A reading at 01:00:10 proves the first minute has elapsed. Exactly one
    // summary comes out: the mean of the first two readings, stamped with
    // the window end (00:01:00).
    let out = engine
        .process(&reading("1970-01-01T01:00:10.000000", 30.0))
        .unwrap();
    assert_eq!(
        out,
        vec![OutputRecord {
            time: 60_000,
            field: "temperature".to_string(),
            value: 15.0,
        }]
    );

    // The window holding the third reading stays open until a later event.
    assert_eq!(engine.open_windows(), 1);
}

#[test]
fn test_malformed_records_do_not_interrupt_the_stream() {
    let mut engine = DownsampleEngine::new(
        TimestampExtractor::for_field("time_recorded"),
        TumblingWindows::of(Duration::from_secs(60)).unwrap(),
        "temperature",
    );

    engine
        .process(&reading("1970-01-01T00:00:10.000000", 4.0))
        .unwrap();

    // A malformed record is rejected without touching window state...
    assert!(engine.process(&reading("not-a-date", 1_000.0)).is_err());

    // ...and the stream continues as if it never happened.
    engine
        .process(&reading("1970-01-01T00:00:50.000000", 6.0))
        .unwrap();
    let out = engine
        .process(&reading("1970-01-01T00:01:00.000000", 0.0))
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].value, 5.0);
}
