//! Liveness endpoint reporting indicator results

use std::path::{Path, PathBuf};
use std::sync::Arc;

use armature_config::ByteSize;
use async_trait::async_trait;
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStatus {
    Up,
    Down,
}

/// Outcome of a single indicator: its status plus free-form details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorResult {
    pub status: IndicatorStatus,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl IndicatorResult {
    pub fn up(details: Map<String, Value>) -> Self {
        Self {
            status: IndicatorStatus::Up,
            details,
        }
    }

    pub fn down(details: Map<String, Value>) -> Self {
        Self {
            status: IndicatorStatus::Down,
            details,
        }
    }
}

#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Key under which the result is reported
    fn name(&self) -> &str;

    async fn check(&self) -> IndicatorResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// `{ status, info, error, details }`: `info` holds indicators that are up,
/// `error` those that are down, `details` all of them
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub info: Map<String, Value>,
    pub error: Map<String, Value>,
    pub details: Map<String, Value>,
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        let status = match self.status {
            HealthStatus::Ok => StatusCode::OK,
            HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(self)).into_response()
    }
}

/// Runs every registered indicator on each request
#[derive(Default, Clone)]
pub struct HealthService {
    indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthService {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: impl HealthIndicator + 'static) -> Self {
        self.indicators.push(Arc::new(indicator));
        self
    }

    pub async fn check(&self) -> HealthReport {
        let mut report = HealthReport {
            status: HealthStatus::Ok,
            info: Map::new(),
            error: Map::new(),
            details: Map::new(),
        };

        for indicator in &self.indicators {
            let result = indicator.check().await;
            let name = indicator.name().to_owned();
            let value = serde_json::to_value(&result).unwrap_or_else(|_| json!({ "status": "down" }));

            if result.status == IndicatorStatus::Up {
                report.info.insert(name.clone(), value.clone());
            } else {
                report.status = HealthStatus::Error;
                report.error.insert(name.clone(), value.clone());
            }
            report.details.insert(name, value);
        }

        report
    }
}

pub async fn health_handler(State(service): State<HealthService>) -> HealthReport {
    let report = service.check().await;
    if report.status == HealthStatus::Error {
        tracing::warn!(error = ?report.error, "health check failed");
    }
    report
}

/// Compares the process resident set size against a threshold
#[derive(Debug, Clone, Copy)]
pub struct MemoryRssIndicator {
    threshold: ByteSize,
}

impl MemoryRssIndicator {
    pub const fn new(threshold: ByteSize) -> Self {
        Self { threshold }
    }
}

#[async_trait]
impl HealthIndicator for MemoryRssIndicator {
    fn name(&self) -> &str {
        "memory_rss"
    }

    async fn check(&self) -> IndicatorResult {
        let mut details = Map::new();

        let Some(rss) = resident_set_size().await else {
            details.insert("message".to_owned(), json!("resident set size unavailable on this platform"));
            return IndicatorResult::up(details);
        };

        details.insert("rss".to_owned(), json!(rss));
        details.insert("threshold".to_owned(), json!(self.threshold.as_u64()));

        if rss > self.threshold.as_u64() {
            details.insert(
                "message".to_owned(),
                json!(format!("resident set size {rss} exceeds {}", self.threshold)),
            );
            IndicatorResult::down(details)
        } else {
            IndicatorResult::up(details)
        }
    }
}

/// Compares the used share of a filesystem against a threshold
#[derive(Debug, Clone)]
pub struct DiskStorageIndicator {
    path: PathBuf,
    threshold_percent: f64,
}

impl DiskStorageIndicator {
    pub fn new(path: impl Into<PathBuf>, threshold_percent: f64) -> Self {
        Self {
            path: path.into(),
            threshold_percent,
        }
    }
}

#[async_trait]
impl HealthIndicator for DiskStorageIndicator {
    fn name(&self) -> &str {
        "storage"
    }

    async fn check(&self) -> IndicatorResult {
        let mut details = Map::new();
        details.insert("path".to_owned(), json!(self.path.display().to_string()));
        details.insert("thresholdPercent".to_owned(), json!(self.threshold_percent));

        let path = self.path.clone();
        let usage = match tokio::task::spawn_blocking(move || disk_usage(&path)).await {
            Ok(Ok(usage)) => usage,
            Ok(Err(e)) => {
                details.insert("message".to_owned(), json!(format!("failed to read disk usage: {e}")));
                return IndicatorResult::down(details);
            }
            Err(e) => {
                details.insert("message".to_owned(), json!(format!("disk usage check aborted: {e}")));
                return IndicatorResult::down(details);
            }
        };

        details.insert("total".to_owned(), json!(usage.total));
        details.insert("available".to_owned(), json!(usage.available));

        let Some(used) = usage.used_ratio() else {
            details.insert("message".to_owned(), json!("filesystem reports no capacity"));
            return IndicatorResult::up(details);
        };

        if used > self.threshold_percent {
            details.insert(
                "message".to_owned(),
                json!(format!("used storage {used:.3} exceeds {}", self.threshold_percent)),
            );
            IndicatorResult::down(details)
        } else {
            IndicatorResult::up(details)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DiskUsage {
    total: u64,
    available: u64,
}

impl DiskUsage {
    /// Share of the filesystem in use, `None` when it reports no capacity
    #[allow(clippy::cast_precision_loss)]
    fn used_ratio(self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let used = self.total.saturating_sub(self.available);
        Some(used as f64 / self.total as f64)
    }
}

fn disk_usage(path: &Path) -> std::io::Result<DiskUsage> {
    Ok(DiskUsage {
        total: fs2::total_space(path)?,
        available: fs2::available_space(path)?,
    })
}

async fn resident_set_size() -> Option<u64> {
    let status = tokio::fs::read_to_string("/proc/self/status").await.ok()?;
    parse_vm_rss(&status)
}

/// Extract `VmRSS` from `/proc/<pid>/status`, in bytes
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find_map(|line| line.strip_prefix("VmRSS:"))?;
    let kib: u64 = line.trim().trim_end_matches("kB").trim().parse().ok()?;
    kib.checked_mul(1024)
}
