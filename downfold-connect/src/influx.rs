//! InfluxDB v3 HTTP client and line protocol points.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;

use crate::error::InfluxError;

/// Connection parameters for an InfluxDB v3 database.
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    /// Base URL, e.g. `https://eu-central-1-1.aws.cloud2.influxdata.com`.
    pub host: String,
    pub token: String,
    pub database: String,
    /// Organization; the v3 endpoints key on the database, but cloud hosts
    /// still accept it.
    pub org: Option<String>,
}

/// One measurement point in the sink write format:
/// measurement, static tags, numeric fields, and an epoch-millisecond time.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
    pub time: i64,
}

impl Point {
    pub fn new(measurement: impl Into<String>, time: i64) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            time,
        }
    }

    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Render as one line of InfluxDB line protocol:
    /// `measurement,tag=v field=1.5 <timestamp>`.
    ///
    /// Identifiers escape commas, spaces, and (for tags and field names)
    /// equals signs.
    pub fn to_line_protocol(&self) -> String {
        let mut line = escape_measurement(&self.measurement);
        for (name, value) in &self.tags {
            let _ = write!(line, ",{}={}", escape_identifier(name), escape_identifier(value));
        }
        line.push(' ');
        let mut first = true;
        for (name, value) in &self.fields {
            if !first {
                line.push(',');
            }
            first = false;
            let _ = write!(line, "{}={}", escape_identifier(name), value);
        }
        let _ = write!(line, " {}", self.time);
        line
    }
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_identifier(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ").replace('=', "\\=")
}

/// Minimal client for the InfluxDB v3 SQL query and line protocol write
/// endpoints.
pub struct InfluxClient {
    http: reqwest::Client,
    config: InfluxConfig,
}

impl InfluxClient {
    pub fn new(config: InfluxConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), path)
    }

    /// Run a SQL query and return the result rows as JSON objects.
    pub async fn query_sql(&self, query: &str) -> Result<Vec<serde_json::Map<String, Value>>, InfluxError> {
        let mut body = serde_json::json!({
            "db": self.config.database,
            "q": query,
            "format": "json",
        });
        if let Some(org) = &self.config.org {
            body["org"] = Value::String(org.clone());
        }

        let response = self
            .http
            .post(self.endpoint("/api/v3/query_sql"))
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfluxError::Query {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Write line protocol at millisecond precision.
    pub async fn write_lp(&self, lines: &str) -> Result<(), InfluxError> {
        let mut params = vec![
            ("db", self.config.database.as_str()),
            ("precision", "millisecond"),
        ];
        if let Some(org) = &self.config.org {
            params.push(("org", org.as_str()));
        }

        let response = self
            .http
            .post(self.endpoint("/api/v3/write_lp"))
            .bearer_auth(&self.config.token)
            .query(&params)
            .body(lines.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InfluxError::Write {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Write a single point.
    pub async fn write(&self, point: &Point) -> Result<(), InfluxError> {
        self.write_lp(&point.to_line_protocol()).await
    }
}
