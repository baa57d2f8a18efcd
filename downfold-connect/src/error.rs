use thiserror::Error;

/// Transport-side failures: consuming, decoding, and publishing envelopes.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// The payload is not a valid JSON record. Per-record: log and drop.
    #[error("record payload is not valid JSON: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    /// The outbound transport rejected a message. Surfaced to the caller;
    /// not retried here.
    #[error("publish to `{topic}` failed: {source}")]
    Publish {
        topic: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },
}

/// Time-series store failures: query and write.
#[derive(Debug, Error)]
pub enum InfluxError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("query returned status {status}: {body}")]
    Query { status: u16, body: String },

    #[error("write returned status {status}: {body}")]
    Write { status: u16, body: String },
}
