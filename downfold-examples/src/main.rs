use std::time::Duration;

use downfold_core::engine::DownsampleEngine;
use downfold_core::time::TimestampExtractor;
use downfold_core::types::Record;
use downfold_core::window::TumblingWindows;

fn main() -> anyhow::Result<()> {
    // (time_recorded, temperature)
    let readings: Vec<(&str, f64)> = vec![
        ("1970-01-01T00:00:05.000000", 10.0),
        ("1970-01-01T00:00:35.000000", 20.0),
        // Out of order inside the same open window: still folds.
        ("1970-01-01T00:00:20.000000", 30.0),
        // Proves the first minute has elapsed, closing [0, 60s).
        ("1970-01-01T00:01:10.000000", 40.0),
        // Late for the closed window: dropped.
        ("1970-01-01T00:00:59.000000", 99.0),
        // Closes [60s, 120s).
        ("1970-01-01T00:02:30.000000", 50.0),
    ];

    let mut engine = DownsampleEngine::new(
        TimestampExtractor::for_field("time_recorded"),
        TumblingWindows::of(Duration::from_secs(60))?,
        "temperature",
    );

    for (time, value) in readings {
        let record = Record::new()
            .with_field("time_recorded", time)
            .with_field("temperature", value);
        for summary in engine.process(&record)? {
            println!("time={} {}={}", summary.time, summary.field, summary.value);
        }
    }

    println!("open windows at shutdown: {}", engine.open_windows());
    Ok(())
}
