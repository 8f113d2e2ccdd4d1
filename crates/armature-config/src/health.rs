use std::path::PathBuf;

use serde::Deserialize;

use crate::size::ByteSize;

/// Health check endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_path")]
    pub path: String,
    /// Report unhealthy once the process resident set exceeds this size
    #[serde(default = "default_memory_rss_threshold")]
    pub memory_rss_threshold: ByteSize,
    /// Filesystem whose usage is checked
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Report unhealthy once the used share of `storage_path` exceeds this, 0.0 to 1.0
    #[serde(default = "default_storage_threshold_percent")]
    pub storage_threshold_percent: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_path(),
            memory_rss_threshold: default_memory_rss_threshold(),
            storage_path: default_storage_path(),
            storage_threshold_percent: default_storage_threshold_percent(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/health".to_string()
}

const fn default_memory_rss_threshold() -> ByteSize {
    ByteSize::mib(150)
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("/")
}

const fn default_storage_threshold_percent() -> f64 {
    0.9
}
