//! Bearer token issuance and verification for Armature
//!
//! Tokens are HS256 JWTs. Verification yields an [`armature_core::Identity`]
//! or an [`AuthError`], which converts into an `Unauthorized` failure.

mod bearer;
mod error;
mod jwt;

pub use bearer::bearer_token;
pub use error::AuthError;
pub use jwt::{JwtService, TokenClaims};
