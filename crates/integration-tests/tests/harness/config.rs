//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use armature_config::{
    ApiConfig, AuthConfig, BaseUrls, ByteSize, Config, CorsConfig, ErrorDefinitionConfig, ErrorsConfig,
    HealthConfig, ServerConfig,
};
use armature_core::Environment;
use secrecy::SecretString;

/// Signing secret shared by the builder and the token helpers
pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                environment: Environment::Development,
                deploy_environment: Environment::Development,
                server: ServerConfig {
                    listen_address: SocketAddr::from(([127, 0, 0, 1], 0)),
                    health: HealthConfig {
                        // Generous so the test process never trips it
                        memory_rss_threshold: ByteSize::mib(64 * 1024),
                        storage_threshold_percent: 1.0,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                api: ApiConfig::default(),
                base_urls: BaseUrls::default(),
                auth: AuthConfig {
                    enabled: true,
                    jwt_secret: SecretString::from(SECRET),
                    jwt_expires_in: "1h".to_owned(),
                    public_paths: vec!["/health".to_owned()],
                },
                errors: ErrorsConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Render errors without the debug block
    pub fn production(mut self) -> Self {
        self.config.environment = Environment::Production;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Register an application error code
    pub fn with_error(mut self, code: &str, status_code: u16, message: &str) -> Self {
        self.config.errors.definitions.insert(
            code.to_owned(),
            ErrorDefinitionConfig {
                status_code,
                message: message.to_owned(),
            },
        );
        self
    }

    /// Add a path prefix that skips authentication
    pub fn with_public_path(mut self, prefix: &str) -> Self {
        self.config.auth.public_paths.push(prefix.to_owned());
        self
    }

    /// Serve versioned routes under `/v{version}`
    pub fn with_api_version(mut self, version: &str) -> Self {
        self.config.api.default_version = version.to_owned();
        self
    }

    /// Set the resident memory threshold of the health check
    pub fn with_memory_threshold(mut self, threshold: ByteSize) -> Self {
        self.config.server.health.memory_rss_threshold = threshold;
        self
    }

    /// Check usage of the filesystem holding `path` against `threshold_percent`
    pub fn with_storage(mut self, path: &str, threshold_percent: f64) -> Self {
        self.config.server.health.storage_path = path.into();
        self.config.server.health.storage_threshold_percent = threshold_percent;
        self
    }

    /// Limit accepted JSON bodies
    pub fn with_json_body_limit(mut self, limit: ByteSize) -> Self {
        self.config.server.json_body_limit = limit;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config.validate().expect("test configuration must be valid");
        self.config
    }
}
