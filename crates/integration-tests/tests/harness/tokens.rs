//! Bearer tokens for the test secret

use std::time::Duration;

use armature_auth::{JwtService, TokenClaims};
use armature_core::Claims;
use chrono::Utc;
use secrecy::SecretString;

use super::config::SECRET;

fn service(secret: &str) -> JwtService {
    JwtService::new(&SecretString::from(secret), Duration::from_secs(3600)).unwrap()
}

fn claims(sub: &str) -> Claims {
    Claims {
        subject: Some(sub.to_owned()),
        email: Some(format!("{sub}@example.com")),
        username: Some(sub.to_owned()),
        ..Claims::default()
    }
}

/// Valid token for `sub`
pub fn token(sub: &str) -> String {
    service(SECRET).sign(&claims(sub)).unwrap()
}

/// Valid token carrying extra claims
pub fn token_with(sub: &str, extra: serde_json::Value) -> String {
    let mut claims = claims(sub);
    if let serde_json::Value::Object(extra) = extra {
        claims.additional.extend(extra);
    }
    service(SECRET).sign(&claims).unwrap()
}

/// Token whose `exp` passed well beyond the clock leeway
pub fn expired_token(sub: &str) -> String {
    let mut claims = TokenClaims::new(claims(sub));
    claims.issued_at = Some(Utc::now() - chrono::Duration::hours(2));
    claims.expiration = Some(Utc::now() - chrono::Duration::hours(1));
    service(SECRET).sign_claims(&claims).unwrap()
}

/// Correctly formed token signed with a different secret
pub fn foreign_token(sub: &str) -> String {
    service("some-other-secret-that-is-long-enough!!").sign(&claims(sub)).unwrap()
}

/// Valid signature but no `sub`
pub fn subjectless_token() -> String {
    service(SECRET)
        .sign(&Claims {
            email: Some("ghost@example.com".to_owned()),
            ..Claims::default()
        })
        .unwrap()
}
