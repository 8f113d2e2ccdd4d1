use axum::extract::FromRequestParts;
use http::request::Parts;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::failure::Failure;

/// JWT claims as carried by bearer tokens
///
/// Registered time claims (`exp`, `nbf`, `iat`) are handled by the token
/// library; everything else not named here lands in `additional`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the user id
    #[serde(default, rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Additional claims for flexible access to custom fields
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("token payload has no subject")]
    MissingSubject,
}

/// Authenticated caller, inserted into request extensions by the gate
///
/// Always carries a non-empty subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    #[serde(rename = "sub")]
    subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(flatten)]
    claims: Map<String, Value>,
}

impl Identity {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Extract a claim value by path, supporting nested claims
    ///
    /// Paths can be simple (e.g. "sub") or nested (e.g. "org.role").
    /// Identities built by the token service also carry `exp`, `nbf` and
    /// `iat` as unix seconds when the token had them.
    #[must_use]
    pub fn claim(&self, path: &str) -> Option<String> {
        match path {
            "sub" => return Some(self.subject.clone()),
            "email" => return self.email.clone(),
            "username" => return self.username.clone(),
            _ => {}
        }

        let mut parts = path.split('.');
        let first = parts.next()?;
        let current = parts.fold(self.claims.get(first).unwrap_or(&Value::Null), |current, part| {
            current.get(part).unwrap_or(&Value::Null)
        });

        match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl TryFrom<Claims> for Identity {
    type Error = IdentityError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let subject = claims
            .subject
            .filter(|s| !s.trim().is_empty())
            .ok_or(IdentityError::MissingSubject)?;

        Ok(Self {
            subject,
            email: claims.email,
            username: claims.username,
            claims: claims.additional,
        })
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(Failure::unauthorized)
    }
}
