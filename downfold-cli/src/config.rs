//! Configuration surface: clap flags with environment-variable fallbacks.

use std::collections::BTreeMap;
use std::time::Duration;

use clap::Args;
use thiserror::Error;

use downfold_connect::influx::InfluxConfig;
use downfold_connect::kafka::{KafkaConfig, OffsetReset};
use downfold_core::time::DEFAULT_TIME_FORMAT;

/// Startup configuration failures. Fatal: the process exits non-zero.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration `{value}`: expected {{int}}{{unit}} i.e. `10s`, with unit one of s, m, h, d, w")]
    InvalidDuration { value: String },

    #[error("invalid tag set `{value}`: expected a JSON object of string pairs: {source}")]
    InvalidTags {
        value: String,
        source: serde_json::Error,
    },
}

const UNIT_SECONDS: &[(char, u64)] = &[
    ('s', 1),
    ('m', 60),
    ('h', 3_600),
    ('d', 86_400),
    ('w', 604_800),
];

/// Parse `{int}{unit}` duration strings such as `10s`, `1m`, `5h`.
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: value.to_string(),
    };
    let unit = value.chars().last().ok_or_else(invalid)?;
    let scale = UNIT_SECONDS
        .iter()
        .find(|(u, _)| *u == unit)
        .map(|(_, s)| *s)
        .ok_or_else(invalid)?;
    let count: u64 = value[..value.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(count * scale))
}

/// Parse the static tag set from a JSON object such as `{"host":"edge-1"}`.
pub fn parse_tags(value: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    if value.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(value).map_err(|source| ConfigError::InvalidTags {
        value: value.to_string(),
        source,
    })
}

/// Kafka connection and consumer-group settings.
#[derive(Args, Debug, Clone)]
pub struct KafkaArgs {
    /// Broker bootstrap list.
    #[arg(long, env = "DOWNFOLD_BROKERS", default_value = "localhost:9092")]
    pub brokers: String,

    /// Consumer group identity.
    #[arg(long, env = "DOWNFOLD_GROUP_ID", default_value = "downfold")]
    pub group_id: String,

    /// Where a new consumer group starts reading: earliest or latest.
    #[arg(long, env = "DOWNFOLD_OFFSET_RESET", default_value = "earliest")]
    pub offset_reset: OffsetReset,
}

impl KafkaArgs {
    pub fn to_config(&self) -> KafkaConfig {
        KafkaConfig {
            brokers: self.brokers.clone(),
            group_id: self.group_id.clone(),
            offset_reset: self.offset_reset,
        }
    }
}

/// Time-series store connection settings.
#[derive(Args, Debug, Clone)]
pub struct InfluxArgs {
    /// Base URL of the InfluxDB v3 host.
    #[arg(long, env = "INFLUXDB_HOST")]
    pub influx_host: String,

    /// API token.
    #[arg(long, env = "INFLUXDB_TOKEN", hide_env_values = true)]
    pub influx_token: String,

    /// Database (bucket) name.
    #[arg(long, env = "INFLUXDB_DATABASE")]
    pub influx_database: String,

    /// Organization, if the host requires one.
    #[arg(long, env = "INFLUXDB_ORG")]
    pub influx_org: Option<String>,
}

impl InfluxArgs {
    pub fn to_config(&self) -> InfluxConfig {
        InfluxConfig {
            host: self.influx_host.clone(),
            token: self.influx_token.clone(),
            database: self.influx_database.clone(),
            org: self.influx_org.clone(),
        }
    }
}

/// Windowing settings for the downsampler.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Field holding the record's event time.
    #[arg(long, env = "DOWNFOLD_TIME_FIELD", default_value = "time_recorded")]
    pub time_field: String,

    /// chrono format the time field parses with.
    #[arg(long, env = "DOWNFOLD_TIME_FORMAT", default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,

    /// Numeric field to aggregate.
    #[arg(long, env = "DOWNFOLD_DATA_FIELD")]
    pub data_field: String,

    /// Tumbling window size, e.g. `1m`.
    #[arg(long, env = "DOWNFOLD_WINDOW_SIZE", default_value = "1m", value_parser = parse_duration)]
    pub window_size: Duration,
}
