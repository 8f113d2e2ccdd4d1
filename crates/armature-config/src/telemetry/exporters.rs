use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Where and how OTLP data is shipped
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// Collector endpoint, e.g. `http://collector:4317`
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// Per export request timeout, e.g. `10s`
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Span batching; ignored by the metrics exporter
    #[serde(default)]
    pub batch: BatchConfig,
}

impl ExporterConfig {
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration
    pub fn timeout(&self) -> anyhow::Result<Duration> {
        parse_duration("timeout", &self.timeout)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

/// Span batching applied by the tracer
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BatchConfig {
    pub max_batch_size: usize,
    pub max_queue_size: usize,
    /// Delay between two consecutive exports, e.g. `5s`
    pub delay: String,
}

impl BatchConfig {
    /// # Errors
    ///
    /// Returns an error if `delay` is not a valid duration
    pub fn delay(&self) -> anyhow::Result<Duration> {
        parse_duration("batch.delay", &self.delay)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 512,
            max_queue_size: 2048,
            delay: "5s".to_owned(),
        }
    }
}

fn default_timeout() -> String {
    "10s".to_owned()
}

fn parse_duration(field: &str, value: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid telemetry exporter {field} `{value}`: {e}"))
}
