use armature_core::{Failure, FrameworkKind, IdentityError};

/// Message sent when a verified token does not identify a user
pub const INVALID_TOKEN_PAYLOAD: &str = "Invalid token payload";

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header on a protected route
    #[error("missing bearer token")]
    MissingToken,

    /// `Authorization` header present but not `Bearer <token>`
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Token is not a structurally valid JWT
    #[error("malformed token: {0}")]
    Malformed(#[from] jwt_compact::ParseError),

    /// Signature, algorithm or claim decoding failed
    #[error("invalid token: {0}")]
    Invalid(jwt_compact::ValidationError),

    /// Token `exp` lies in the past
    #[error("token has expired")]
    Expired,

    /// Token `nbf` lies in the future
    #[error("token is not yet valid")]
    NotYetValid,

    /// Verified token without a usable subject
    #[error("invalid token payload: {0}")]
    InvalidPayload(#[from] IdentityError),

    /// Token lifetime cannot be represented
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,

    /// Token could not be signed
    #[error("failed to sign token: {0}")]
    Signing(jwt_compact::CreationError),
}

impl From<jwt_compact::ValidationError> for AuthError {
    fn from(error: jwt_compact::ValidationError) -> Self {
        match error {
            jwt_compact::ValidationError::Expired => Self::Expired,
            jwt_compact::ValidationError::NotMature => Self::NotYetValid,
            other => Self::Invalid(other),
        }
    }
}

impl From<AuthError> for Failure {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidPayload(_) => {
                Self::framework(FrameworkKind::Unauthorized, Some(INVALID_TOKEN_PAYLOAD.to_owned()))
            }
            AuthError::LifetimeOutOfRange | AuthError::Signing(_) => Self::unknown(error),
            _ => Self::unauthorized(),
        }
    }
}
