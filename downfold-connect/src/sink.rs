//! Sink adapter: persists records as measurement points.

use std::collections::BTreeMap;

use tracing::{debug, error};

use downfold_core::types::Record;

use crate::influx::{InfluxClient, Point};

/// Writes one point per inbound record, dropping failures.
///
/// A failed write never blocks later points: there is no retry queue and no
/// dead-letter path. Records without a usable `time` or data field are
/// dropped the same way.
pub struct InfluxSink {
    client: InfluxClient,
    measurement: String,
    tags: BTreeMap<String, String>,
    data_field: String,
}

impl InfluxSink {
    pub fn new(
        client: InfluxClient,
        measurement: impl Into<String>,
        tags: BTreeMap<String, String>,
        data_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            measurement: measurement.into(),
            tags,
            data_field: data_field.into(),
        }
    }

    /// Write one record as a point. Returns whether the point was persisted.
    pub async fn handle(&self, record: &Record) -> bool {
        let Some(time) = record.numeric("time") else {
            error!(payload = ?record.fields, "record has no usable `time` field, dropping point");
            return false;
        };
        let Some(value) = record.numeric(&self.data_field) else {
            error!(
                field = %self.data_field,
                payload = ?record.fields,
                "record has no usable data field, dropping point"
            );
            return false;
        };

        let mut point = Point::new(self.measurement.clone(), time as i64);
        for (name, tag) in &self.tags {
            point = point.tag(name.clone(), tag.clone());
        }
        point = point.field(self.data_field.clone(), value);

        match self.client.write(&point).await {
            Ok(()) => {
                debug!(time = point.time, "persisted point");
                true
            }
            Err(err) => {
                error!(error = %err, time = point.time, "write failed, dropping point");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::influx::InfluxConfig;

    fn unreachable_sink() -> InfluxSink {
        // Closed port: any actual write attempt fails fast.
        let client = InfluxClient::new(InfluxConfig {
            host: "http://127.0.0.1:1".to_string(),
            token: "t".to_string(),
            database: "db".to_string(),
            org: None,
        });
        InfluxSink::new(client, "downsampled", BTreeMap::new(), "temperature")
    }

    #[tokio::test]
    async fn test_record_without_time_is_dropped() {
        let record = Record::new().with_field("temperature", 1.0);
        assert!(!unreachable_sink().handle(&record).await);
    }

    #[tokio::test]
    async fn test_record_without_data_field_is_dropped() {
        let record = Record::new().with_field("time", 60_000i64);
        assert!(!unreachable_sink().handle(&record).await);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_block_later_points() {
        let sink = unreachable_sink();
        let record = Record::new()
            .with_field("time", 60_000i64)
            .with_field("temperature", 15.0);
        assert!(!sink.handle(&record).await);
        // The next point is attempted independently of the first failure.
        assert!(!sink.handle(&record).await);
    }
}
