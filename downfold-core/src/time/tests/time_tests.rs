use super::*;

// ── TimestampExtractor ────────────────────────────────────────────────────

fn record_with_time(value: impl Into<FieldValue>) -> Record {
    Record::new()
        .with_field("time_recorded", value)
        .with_field("temperature", 20.0)
}

#[test]
fn test_extract_default_format() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    let record = record_with_time("1970-01-01T00:01:00.000000");
    assert_eq!(extractor.extract(&record).unwrap(), 60_000);
}

#[test]
fn test_extract_fractional_seconds_optional() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    assert_eq!(
        extractor.extract(&record_with_time("1970-01-01T00:00:01")).unwrap(),
        1_000
    );
    assert_eq!(
        extractor.extract(&record_with_time("1970-01-01T00:00:01.250")).unwrap(),
        1_250
    );
}

#[test]
fn test_extract_rfc3339_fallback() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    // Offset-carrying inputs fall back to RFC 3339 parsing.
    assert_eq!(
        extractor.extract(&record_with_time("1970-01-01T00:01:00Z")).unwrap(),
        60_000
    );
    assert_eq!(
        extractor.extract(&record_with_time("1970-01-01T01:00:00+01:00")).unwrap(),
        0
    );
}

#[test]
fn test_extract_numeric_passthrough() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    assert_eq!(extractor.extract(&record_with_time(90_000i64)).unwrap(), 90_000);
    assert_eq!(extractor.extract(&record_with_time(1_500.0)).unwrap(), 1_500);
}

#[test]
fn test_extract_missing_field() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    let record = Record::new().with_field("temperature", 20.0);
    assert!(matches!(
        extractor.extract(&record),
        Err(EngineError::MissingTimeField { field }) if field == "time_recorded"
    ));
}

#[test]
fn test_extract_malformed_text() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    let err = extractor.extract(&record_with_time("not-a-date")).unwrap_err();
    assert!(matches!(
        &err,
        EngineError::MalformedTimestamp { value, .. } if value == "not-a-date"
    ));
    assert!(err.is_record_error());
}

#[test]
fn test_extract_non_temporal_value() {
    let extractor = TimestampExtractor::for_field("time_recorded");
    assert!(matches!(
        extractor.extract(&record_with_time(true)),
        Err(EngineError::MalformedTimestamp { .. })
    ));
}

#[test]
fn test_extract_custom_format() {
    let extractor = TimestampExtractor::new("ts", "%Y/%m/%d %H:%M:%S");
    let record = Record::new().with_field("ts", "1970/01/01 00:02:00");
    assert_eq!(extractor.extract(&record).unwrap(), 120_000);
}

// ── WatermarkClock ────────────────────────────────────────────────────────

#[test]
fn test_watermark_starts_at_sentinel() {
    let clock = WatermarkClock::new();
    assert_eq!(clock.current(), EVENT_TIME_MIN);
    assert!(!clock.is_due(EVENT_TIME_MIN));
}

#[test]
fn test_watermark_is_monotonic() {
    let mut clock = WatermarkClock::new();
    let mut previous = clock.current();
    for t in [5_000, 3_000, 10_000, 10_000, -50, 10_001] {
        clock.advance(t);
        assert!(clock.current() >= previous, "watermark regressed at {t}");
        previous = clock.current();
    }
    assert_eq!(clock.current(), 10_001);
}

#[test]
fn test_advance_reports_only_movement() {
    let mut clock = WatermarkClock::new();
    assert_eq!(clock.advance(1_000), Some(Watermark::new(1_000)));
    assert_eq!(clock.advance(500), None);
    assert_eq!(clock.advance(1_000), None);
    assert_eq!(clock.advance(2_000), Some(Watermark::new(2_000)));
}

#[test]
fn test_is_due_uses_exclusive_end() {
    let mut clock = WatermarkClock::new();
    clock.advance(59_999);
    // The interval [0, 60_000) has not fully elapsed at watermark 59_999.
    assert!(!clock.is_due(60_000));
    clock.advance(60_000);
    assert!(clock.is_due(60_000));
    assert!(!clock.is_due(EVENT_TIME_MAX));
}
