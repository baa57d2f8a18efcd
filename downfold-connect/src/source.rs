//! Periodic source adapter: polls the time-series store and republishes
//! each row onto the record stream.

use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::codec::Envelope;
use crate::influx::InfluxClient;
use crate::kafka::RecordProducer;

/// Wait between a failed poll and the next attempt.
const FAILURE_BACKOFF: Duration = Duration::from_secs(1);

/// Polls a measurement on a fixed interval and republishes each row.
///
/// Failures never stop the loop: a failed query or publish is logged, the
/// loop backs off briefly, and the next tick retries. Empty results are not
/// an error.
pub struct PeriodicSource {
    client: InfluxClient,
    producer: RecordProducer,
    measurement: String,
    interval: Duration,
    key_field: Option<String>,
}

impl PeriodicSource {
    pub fn new(
        client: InfluxClient,
        producer: RecordProducer,
        measurement: impl Into<String>,
        interval: Duration,
        key_field: Option<String>,
    ) -> Self {
        Self {
            client,
            producer,
            measurement: measurement.into(),
            interval,
            key_field,
        }
    }

    /// Poll forever. Callers race this against a shutdown signal.
    pub async fn run(&self) {
        loop {
            match self.poll_once().await {
                Ok(0) => info!("no new rows to publish"),
                Ok(rows) => info!(rows, "published poll batch"),
                Err(err) => {
                    error!(error = %err, "poll failed");
                    tokio::time::sleep(FAILURE_BACKOFF).await;
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One poll tick: range query over the last interval, one publish per
    /// row. Returns the number of rows published.
    async fn poll_once(&self) -> anyhow::Result<usize> {
        let seconds = self.interval.as_secs().max(1);
        let query = format!(
            "SELECT * FROM \"{}\" WHERE time >= now() - interval '{} seconds'",
            self.measurement, seconds
        );
        let rows = self.client.query_sql(&query).await?;

        let mut published = 0;
        for mut row in rows {
            // The v3 query surfaces the measurement as a pseudo column.
            row.remove("iox::measurement");
            // Downstream extracts event time from the payload, so the store's
            // own time column travels under a payload-level name.
            if let Some(time) = row.remove("time") {
                row.insert("time_recorded".to_string(), time);
            }

            let key = self
                .key_field
                .as_ref()
                .and_then(|field| row.get(field))
                .map(render_key);
            let mut envelope = Envelope::new(Value::Object(row).to_string().into_bytes())
                .with_header("uuid", Uuid::new_v4().to_string());
            envelope.key = key;

            self.producer.send(&envelope).await?;
            published += 1;
        }
        Ok(published)
    }
}

fn render_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
