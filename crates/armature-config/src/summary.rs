use std::net::SocketAddr;

use armature_core::Environment;
use serde::Serialize;
use url::Url;

use crate::{AnyOrList, Config};

/// Non-sensitive view of the configuration, safe to print at startup
#[derive(Debug, Serialize)]
pub struct ConfigSummary<'a> {
    pub environment: Environment,
    pub deploy_environment: Environment,
    pub listen_address: SocketAddr,
    pub base_url: &'a Url,
    pub api_version: &'a str,
    pub log_level: &'a str,
    pub json_body_limit: u64,
    pub cors_origins: Option<&'a AnyOrList>,
    pub auth_enabled: bool,
    pub public_paths: &'a [String],
    pub custom_error_codes: Vec<&'a str>,
    pub telemetry_service_name: Option<&'a str>,
}

impl Config {
    /// Configuration values that may be logged; secrets are never included
    pub fn summary(&self) -> ConfigSummary<'_> {
        let mut custom_error_codes: Vec<_> = self.errors.definitions.keys().map(String::as_str).collect();
        custom_error_codes.sort_unstable();

        ConfigSummary {
            environment: self.environment,
            deploy_environment: self.deploy_environment,
            listen_address: self.server.listen_address,
            base_url: self.base_urls.for_environment(self.deploy_environment),
            api_version: &self.api.default_version,
            log_level: &self.api.log_level,
            json_body_limit: self.server.json_body_limit.as_u64(),
            cors_origins: self.server.cors.as_ref().map(|cors| &cors.origins),
            auth_enabled: self.auth.enabled,
            public_paths: &self.auth.public_paths,
            custom_error_codes,
            telemetry_service_name: self.telemetry.as_ref().map(|t| t.service_name.as_str()),
        }
    }
}

impl ConfigSummary<'_> {
    /// Emit the summary as a single `info` event
    pub fn log(&self) {
        match serde_json::to_string(self) {
            Ok(summary) => tracing::info!(config = %summary, "configuration loaded"),
            Err(e) => tracing::warn!("failed to serialize configuration summary: {e}"),
        }
    }
}
