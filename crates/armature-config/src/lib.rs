#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod auth;
pub mod cors;
mod env;
pub mod errors;
pub mod health;
mod loader;
pub mod server;
pub mod size;
mod summary;
pub mod telemetry;

use armature_core::Environment;
use serde::Deserialize;

pub use api::*;
pub use auth::*;
pub use cors::*;
pub use errors::*;
pub use health::*;
pub use server::*;
pub use size::ByteSize;
pub use summary::ConfigSummary;
pub use telemetry::{MetricsConfig, TelemetryConfig, TracingConfig};

/// Top-level Armature configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Runtime environment; decides debug output in error responses and log format
    #[serde(default)]
    pub environment: Environment,
    /// Environment the service is deployed to
    #[serde(default)]
    pub deploy_environment: Environment,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// API versioning and logging
    #[serde(default)]
    pub api: ApiConfig,
    /// Public base URL per deployment environment
    #[serde(default)]
    pub base_urls: BaseUrls,
    /// Bearer token authentication
    pub auth: AuthConfig,
    /// Application specific error definitions
    #[serde(default)]
    pub errors: ErrorsConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
