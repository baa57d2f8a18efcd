//! Service run loops wiring the adapters to the engine.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, error, info};

use downfold_connect::codec::{self, Envelope};
use downfold_connect::influx::InfluxClient;
use downfold_connect::kafka::{RecordConsumer, RecordProducer};
use downfold_connect::sink::InfluxSink;
use downfold_connect::source::PeriodicSource;
use downfold_core::engine::DownsampleEngine;
use downfold_core::time::TimestampExtractor;
use downfold_core::window::TumblingWindows;

use crate::config::{InfluxArgs, KafkaArgs, WindowArgs};

/// Consume `input`, fold records into tumbling windows, and publish each
/// closed window's summary to `output`.
///
/// This is the single owner of all windowing state: records reach the
/// engine only through this loop, in arrival order.
pub async fn downsample(
    input: &str,
    output: &str,
    kafka: &KafkaArgs,
    window: &WindowArgs,
) -> anyhow::Result<()> {
    let assigner = TumblingWindows::of(window.window_size).context("invalid window size")?;
    let extractor = TimestampExtractor::new(&window.time_field, &window.time_format);
    let mut engine = DownsampleEngine::new(extractor, assigner, &window.data_field);

    let config = kafka.to_config();
    let consumer = RecordConsumer::connect(&config, input).context("connecting consumer")?;
    let producer = RecordProducer::connect(&config, output).context("connecting producer")?;
    info!(input, output, field = %window.data_field, "downsampler started");

    loop {
        let envelope = consumer.recv().await.context("transport receive failed")?;
        let record = match codec::decode_record(&envelope) {
            Ok(record) => record,
            Err(err) => {
                error!(
                    error = %err,
                    payload = %String::from_utf8_lossy(&envelope.payload),
                    "dropping malformed record"
                );
                continue;
            }
        };
        debug!(payload = ?record.fields, "input record received");

        let summaries = match engine.process(&record) {
            Ok(summaries) => summaries,
            Err(err) => {
                error!(error = %err, payload = ?record.fields, "dropping record");
                continue;
            }
        };

        for summary in summaries {
            let envelope = Envelope::new(codec::encode_output(&summary));
            match producer.send(&envelope).await {
                Ok(()) => info!(time = summary.time, value = summary.value, "produced summary"),
                // A rejected publish is logged and not retried.
                Err(err) => error!(error = %err, time = summary.time, "publish failed"),
            }
        }
    }
}

/// Poll the time-series store on a fixed interval and republish rows.
pub async fn influx_source(
    output: &str,
    measurement: &str,
    poll_interval: Duration,
    key_field: Option<String>,
    kafka: &KafkaArgs,
    influx: &InfluxArgs,
) -> anyhow::Result<()> {
    let client = InfluxClient::new(influx.to_config());
    let producer =
        RecordProducer::connect(&kafka.to_config(), output).context("connecting producer")?;
    let source = PeriodicSource::new(client, producer, measurement, poll_interval, key_field);

    info!(output, measurement, interval = ?poll_interval, "source poller started");
    source.run().await;
    Ok(())
}

/// Consume summaries from `input` and persist them as measurement points.
pub async fn influx_sink(
    input: &str,
    measurement: &str,
    data_field: &str,
    tags: BTreeMap<String, String>,
    kafka: &KafkaArgs,
    influx: &InfluxArgs,
) -> anyhow::Result<()> {
    let consumer =
        RecordConsumer::connect(&kafka.to_config(), input).context("connecting consumer")?;
    let sink = InfluxSink::new(InfluxClient::new(influx.to_config()), measurement, tags, data_field);
    info!(input, measurement, "sink writer started");

    loop {
        let envelope = consumer.recv().await.context("transport receive failed")?;
        match codec::decode_record(&envelope) {
            // A failed write is logged inside the sink and never blocks the
            // next point.
            Ok(record) => {
                sink.handle(&record).await;
            }
            Err(err) => {
                error!(
                    error = %err,
                    payload = %String::from_utf8_lossy(&envelope.payload),
                    "dropping malformed record"
                );
            }
        }
    }
}
