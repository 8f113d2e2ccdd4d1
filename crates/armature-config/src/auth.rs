use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Minimum accepted length of the HS256 signing secret
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Bearer token authentication configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Whether the authentication gate is installed
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// HS256 signing secret, at least 32 characters
    pub jwt_secret: SecretString,

    /// Lifetime of issued tokens, e.g. `1d`, `12h` or `30m`
    #[serde(default = "default_jwt_expires_in")]
    pub jwt_expires_in: String,

    /// Path prefixes that skip authentication
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

impl AuthConfig {
    /// Parsed token lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if `jwt_expires_in` is not a valid duration
    pub fn expires_in(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.jwt_expires_in)
            .map_err(|e| anyhow::anyhow!("invalid auth.jwt_expires_in `{}`: {e}", self.jwt_expires_in))
    }

    /// Whether `path` falls under one of the configured public prefixes
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|prefix| path_under_prefix(path, prefix))
    }
}

/// Whether `path` is `prefix` itself or lies below it
///
/// Matching stops at segment boundaries: `/health` covers `/health/live`
/// but not `/healthcheck`.
pub fn path_under_prefix(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_jwt_expires_in() -> String {
    "1d".to_string()
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string()]
}
