use armature_core::{Identity, ResponseSuccess};

/// `GET /v{version}/auth/me`: the identity carried by the bearer token
pub async fn me(identity: Identity) -> ResponseSuccess<Identity> {
    ResponseSuccess::ok("Authenticated user.", identity)
}
