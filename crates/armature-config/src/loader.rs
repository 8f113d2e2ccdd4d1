use std::path::Path;

use anyhow::Context;
use armature_core::ErrorCatalog;
use secrecy::ExposeSecret;

use crate::{Config, auth::MIN_JWT_SECRET_LEN};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;

        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the auth settings, API version, health thresholds,
    /// exporter durations or custom error definitions are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_auth_config()?;
        self.validate_api_config()?;
        self.validate_health_config()?;
        self.validate_telemetry_config()?;
        self.error_catalog()?;
        Ok(())
    }

    /// Error catalog with the configured definitions registered
    ///
    /// # Errors
    ///
    /// Returns an error if a definition is rejected by the catalog
    pub fn error_catalog(&self) -> anyhow::Result<ErrorCatalog> {
        self.errors.catalog().context("invalid error definition")
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let secret_len = self.auth.jwt_secret.expose_secret().chars().count();
        if secret_len < MIN_JWT_SECRET_LEN {
            anyhow::bail!("auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} characters, got {secret_len}");
        }

        let expires_in = self.auth.expires_in()?;
        if expires_in.is_zero() {
            anyhow::bail!("auth.jwt_expires_in must be greater than zero");
        }

        Ok(())
    }

    fn validate_api_config(&self) -> anyhow::Result<()> {
        let version = self.api.default_version.trim();
        if version.is_empty() {
            anyhow::bail!("api.default_version must not be empty");
        }

        if version.contains('/') {
            anyhow::bail!("api.default_version must not contain `/`");
        }

        Ok(())
    }

    fn validate_health_config(&self) -> anyhow::Result<()> {
        let threshold = self.server.health.storage_threshold_percent;
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("server.health.storage_threshold_percent must be between 0.0 and 1.0, got {threshold}");
        }

        Ok(())
    }

    fn validate_telemetry_config(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        for exporter in [telemetry.trace_exporter(), telemetry.metrics_exporter()].into_iter().flatten() {
            exporter.timeout()?;
            exporter.batch.delay()?;
        }

        Ok(())
    }
}
