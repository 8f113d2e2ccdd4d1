use armature_core::Environment;
use serde::Deserialize;
use url::Url;

/// API versioning and logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Version prefix for API routes, e.g. `1` serves under `/v1`
    #[serde(default = "default_version")]
    pub default_version: String,
    /// `tracing` filter directive, e.g. `debug` or `info,armature_server=trace`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApiConfig {
    /// Path prefix for versioned routes
    pub fn version_prefix(&self) -> String {
        format!("/v{}", self.default_version)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_version: default_version(),
            log_level: default_log_level(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}

/// Public base URL of the service in each deployment environment
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseUrls {
    #[serde(default = "default_base_url", alias = "dev")]
    pub development: Url,
    #[serde(default = "default_base_url")]
    pub staging: Url,
    #[serde(default = "default_base_url")]
    pub production: Url,
}

impl BaseUrls {
    pub const fn for_environment(&self, environment: Environment) -> &Url {
        match environment {
            Environment::Development => &self.development,
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            development: default_base_url(),
            staging: default_base_url(),
            production: default_base_url(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:3000").expect("static URL is valid")
}
