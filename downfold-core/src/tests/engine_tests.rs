use std::time::Duration;

use super::*;

fn minute_engine() -> DownsampleEngine {
    DownsampleEngine::new(
        TimestampExtractor::for_field("time_recorded"),
        TumblingWindows::of(Duration::from_secs(60)).unwrap(),
        "temperature",
    )
}

fn reading(ts_ms: i64, value: f64) -> Record {
    Record::new()
        .with_field("time_recorded", ts_ms)
        .with_field("temperature", value)
}

#[test]
fn test_no_output_while_window_open() {
    let mut engine = minute_engine();
    assert!(engine.process(&reading(5_000, 10.0)).unwrap().is_empty());
    assert!(engine.process(&reading(35_000, 20.0)).unwrap().is_empty());
    assert_eq!(engine.open_windows(), 1);
    assert_eq!(engine.watermark(), 35_000);
}

#[test]
fn test_event_past_window_end_closes_it() {
    let mut engine = minute_engine();
    engine.process(&reading(0, 10.0)).unwrap();
    engine.process(&reading(30_000, 20.0)).unwrap();

    // 90_000 >= 60_000 proves [0, 60_000) has fully elapsed.
    let out = engine.process(&reading(90_000, 99.0)).unwrap();
    assert_eq!(
        out,
        vec![OutputRecord {
            time: 60_000,
            field: "temperature".to_string(),
            value: 15.0,
        }]
    );

    // The closing event's own window stays open until a later event arrives.
    assert_eq!(engine.open_windows(), 1);
}

#[test]
fn test_watermark_short_of_end_keeps_window_open() {
    let mut engine = minute_engine();
    engine.process(&reading(5_000, 10.0)).unwrap();
    // 59_999 is inside [0, 60_000): not a closing signal.
    let out = engine.process(&reading(59_999, 20.0)).unwrap();
    assert!(out.is_empty());
    assert_eq!(engine.open_windows(), 1);
}

#[test]
fn test_emitted_exactly_once() {
    let mut engine = minute_engine();
    engine.process(&reading(5_000, 10.0)).unwrap();
    let first = engine.process(&reading(60_000, 1.0)).unwrap();
    assert_eq!(first.len(), 1);

    // Later events must not re-emit the closed window.
    let again = engine.process(&reading(61_000, 1.0)).unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_late_record_is_dropped_not_resurrected() {
    let mut engine = minute_engine();
    engine.process(&reading(5_000, 10.0)).unwrap();
    engine.process(&reading(90_000, 40.0)).unwrap(); // closes [0, 60_000)

    // A record for the closed window is dropped without touching state.
    let out = engine.process(&reading(10_000, 1_000.0)).unwrap();
    assert!(out.is_empty());
    assert_eq!(engine.open_windows(), 1);

    // The next closure emits only what was folded before the drop.
    let out = engine.process(&reading(180_000, 0.0)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].time, 120_000);
    assert_eq!(out[0].value, 40.0);
}

#[test]
fn test_malformed_timestamp_leaves_state_untouched() {
    let mut engine = minute_engine();
    engine.process(&reading(5_000, 10.0)).unwrap();

    let record = Record::new()
        .with_field("time_recorded", "not-a-date")
        .with_field("temperature", 50.0);
    let err = engine.process(&record).unwrap_err();
    assert!(matches!(err, EngineError::MalformedTimestamp { .. }));
    assert!(err.is_record_error());

    // The bad record affected neither watermark nor accumulators.
    assert_eq!(engine.watermark(), 5_000);
    let out = engine.process(&reading(60_000, 0.0)).unwrap();
    assert_eq!(out[0].value, 10.0);
}

#[test]
fn test_missing_data_field_is_per_record() {
    let mut engine = minute_engine();
    let record = Record::new().with_field("time_recorded", 5_000i64);
    assert!(matches!(
        engine.process(&record),
        Err(EngineError::MalformedValue { field }) if field == "temperature"
    ));
    assert_eq!(engine.open_windows(), 0);

    // Non-numeric data field is equally malformed.
    let record = Record::new()
        .with_field("time_recorded", 5_000i64)
        .with_field("temperature", "warm");
    assert!(engine.process(&record).is_err());
}

#[test]
fn test_out_of_order_within_open_window_folds() {
    let mut engine = minute_engine();
    engine.process(&reading(35_000, 30.0)).unwrap();
    // Earlier timestamp, same window: still folds.
    engine.process(&reading(5_000, 10.0)).unwrap();

    let out = engine.process(&reading(60_000, 0.0)).unwrap();
    assert_eq!(out[0].value, 20.0);
}

#[test]
fn test_gap_emits_no_empty_windows() {
    let mut engine = minute_engine();
    engine.process(&reading(5_000, 10.0)).unwrap();

    // Ten quiet minutes pass before the next reading. Accumulators only
    // exist for windows that saw events, so the empty minutes in between
    // produce nothing.
    let out = engine.process(&reading(605_000, 20.0)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].time, 60_000);
    assert_eq!(out[0].value, 10.0);
}

#[test]
fn test_quiet_stream_leaves_window_open() {
    let mut engine = minute_engine();
    for i in 0..10 {
        let out = engine.process(&reading(1_000 * i, i as f64)).unwrap();
        assert!(out.is_empty());
    }
    // No later event ever arrives: the window stays open indefinitely.
    assert_eq!(engine.open_windows(), 1);
}

#[test]
fn test_string_timestamps_drive_windowing() {
    let mut engine = minute_engine();
    let record = Record::new()
        .with_field("time_recorded", "1970-01-01T00:00:05.000000")
        .with_field("temperature", 10.0);
    engine.process(&record).unwrap();
    assert_eq!(engine.watermark(), 5_000);
}
