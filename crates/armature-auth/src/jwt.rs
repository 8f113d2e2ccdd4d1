use std::fmt;
use std::time::Duration;

use armature_config::AuthConfig;
use armature_core::{Claims, Identity};
use jwt_compact::alg::{Hs256, Hs256Key};
use jwt_compact::{AlgorithmExt, Header, TimeOptions, Token, UntrustedToken};
use secrecy::{ExposeSecret, SecretString};

use crate::AuthError;

/// Registered claims (`exp`, `nbf`, `iat`) wrapped around the application claims
pub type TokenClaims = jwt_compact::Claims<Claims>;

/// Issues and verifies HS256 bearer tokens
pub struct JwtService {
    key: Hs256Key,
    expires_in: chrono::Duration,
    time_options: TimeOptions,
}

impl JwtService {
    /// Create a service signing with `secret` and issuing tokens valid for `expires_in`
    ///
    /// # Errors
    ///
    /// Returns an error if `expires_in` is too large to represent
    pub fn new(secret: &SecretString, expires_in: Duration) -> Result<Self, AuthError> {
        let expires_in = chrono::Duration::from_std(expires_in).map_err(|_| AuthError::LifetimeOutOfRange)?;

        Ok(Self {
            key: Hs256Key::new(secret.expose_secret().as_bytes()),
            expires_in,
            time_options: TimeOptions::default(),
        })
    }

    /// Create a service from the `[auth]` configuration section
    ///
    /// # Errors
    ///
    /// Returns an error if `jwt_expires_in` is invalid
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        Ok(Self::new(&config.jwt_secret, config.expires_in()?)?)
    }

    /// Issue a token for `claims` with `iat` set to now and `exp` after the configured lifetime
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be serialized
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let claims = TokenClaims::new(claims.clone()).set_duration_and_issuance(&self.time_options, self.expires_in);
        self.sign_claims(&claims)
    }

    /// Issue a token for fully specified registered claims
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be serialized
    pub fn sign_claims(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        Hs256.token(&Header::empty(), claims, &self.key).map_err(AuthError::Signing)
    }

    /// Verify a token and resolve the identity it carries
    ///
    /// `exp` and `nbf` are enforced when present, with the default clock leeway.
    /// Registered time claims are exposed on the identity as unix seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, signed with another key or
    /// algorithm, expired, not yet valid, or carries no subject
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let untrusted = UntrustedToken::new(token)?;
        let token: Token<Claims> = Hs256.validator::<Claims>(&self.key).validate(&untrusted)?;

        let claims = token.claims();
        if claims.expiration.is_some() {
            claims.validate_expiration(&self.time_options)?;
        }
        if claims.not_before.is_some() {
            claims.validate_maturity(&self.time_options)?;
        }

        let mut custom = claims.custom.clone();
        let registered = [
            ("exp", claims.expiration),
            ("nbf", claims.not_before),
            ("iat", claims.issued_at),
        ];
        for (name, at) in registered {
            if let Some(at) = at {
                custom.additional.insert(name.to_owned(), at.timestamp().into());
            }
        }

        Ok(Identity::try_from(custom)?)
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
