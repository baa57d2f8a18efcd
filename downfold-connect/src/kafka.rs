//! Thin consumer/producer wrappers over rdkafka.
//!
//! The wrappers lift transport messages into [`Envelope`]s and keep all
//! client configuration in one place; they add no buffering or retry of
//! their own.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::{Header, Headers as _, Message as _, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};

use crate::codec::Envelope;
use crate::error::TransportError;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a consumer group without committed offsets starts reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetReset {
    #[default]
    Earliest,
    Latest,
}

impl OffsetReset {
    pub fn as_str(self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

impl std::str::FromStr for OffsetReset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earliest" => Ok(OffsetReset::Earliest),
            "latest" => Ok(OffsetReset::Latest),
            other => Err(format!(
                "unknown offset reset `{other}` (expected `earliest` or `latest`)"
            )),
        }
    }
}

/// Connection and group settings shared by consumer and producer.
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
    pub offset_reset: OffsetReset,
}

/// Consumes envelopes from one topic as part of a consumer group.
pub struct RecordConsumer {
    consumer: StreamConsumer,
}

impl RecordConsumer {
    pub fn connect(config: &KafkaConfig, topic: &str) -> Result<Self, TransportError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("auto.offset.reset", config.offset_reset.as_str())
            .set("enable.auto.commit", "true")
            .create()?;
        consumer.subscribe(&[topic])?;
        Ok(Self { consumer })
    }

    /// Wait for the next message and lift it into an [`Envelope`].
    pub async fn recv(&self) -> Result<Envelope, TransportError> {
        let message = self.consumer.recv().await?;
        let mut envelope = Envelope::new(message.payload().unwrap_or_default().to_vec());
        envelope.key = message
            .key()
            .map(|key| String::from_utf8_lossy(key).into_owned());
        if let Some(headers) = message.headers() {
            for header in headers.iter() {
                if let Some(value) = header.value {
                    envelope.headers.insert(
                        header.key.to_string(),
                        String::from_utf8_lossy(value).into_owned(),
                    );
                }
            }
        }
        Ok(envelope)
    }
}

/// Publishes envelopes to a fixed topic.
pub struct RecordProducer {
    producer: FutureProducer,
    topic: String,
}

impl RecordProducer {
    pub fn connect(config: &KafkaConfig, topic: &str) -> Result<Self, TransportError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "5000")
            .create()?;
        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }

    /// Publish one envelope. A rejected message surfaces to the caller and
    /// is not retried here.
    pub async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        let headers = headers_of(envelope);
        let delivery = match envelope.key.as_deref() {
            Some(key) => {
                let record = FutureRecord::to(&self.topic)
                    .key(key)
                    .payload(&envelope.payload)
                    .headers(headers);
                self.producer.send(record, PUBLISH_TIMEOUT).await
            }
            None => {
                let record = FutureRecord::<(), _>::to(&self.topic)
                    .payload(&envelope.payload)
                    .headers(headers);
                self.producer.send(record, PUBLISH_TIMEOUT).await
            }
        };
        delivery.map(|_| ()).map_err(|(source, _)| TransportError::Publish {
            topic: self.topic.clone(),
            source,
        })
    }

    /// Topic this producer publishes to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

fn headers_of(envelope: &Envelope) -> OwnedHeaders {
    let mut headers = OwnedHeaders::new();
    for (name, value) in &envelope.headers {
        headers = headers.insert(Header {
            key: name,
            value: Some(value.as_bytes()),
        });
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_reset_round_trip() {
        assert_eq!("earliest".parse::<OffsetReset>().unwrap(), OffsetReset::Earliest);
        assert_eq!("latest".parse::<OffsetReset>().unwrap(), OffsetReset::Latest);
        assert_eq!(OffsetReset::Earliest.as_str(), "earliest");
        assert_eq!(OffsetReset::Latest.as_str(), "latest");
    }

    #[test]
    fn test_offset_reset_rejects_unknown() {
        let err = "sometimes".parse::<OffsetReset>().unwrap_err();
        assert!(err.contains("sometimes"));
    }

    #[test]
    fn test_offset_reset_default_is_earliest() {
        assert_eq!(OffsetReset::default(), OffsetReset::Earliest);
    }
}
