use std::sync::Arc;

use armature_auth::{JwtService, bearer_token};
use armature_config::path_under_prefix;
use armature_core::Failure;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::routes::PublicRoutes;

/// Shared state of the authentication gate
#[derive(Debug, Clone)]
pub struct AuthGate {
    jwt: Arc<JwtService>,
    public_routes: PublicRoutes,
    public_prefixes: Arc<[String]>,
}

impl AuthGate {
    pub fn new(jwt: Arc<JwtService>, public_routes: PublicRoutes, public_prefixes: Vec<String>) -> Self {
        Self {
            jwt,
            public_routes,
            public_prefixes: public_prefixes.into(),
        }
    }

    fn is_public(&self, request: &Request) -> bool {
        let matched = request.extensions().get::<MatchedPath>();

        // Unrouted requests fall through to the 404 fallback
        let Some(matched) = matched else { return true };

        let path = request.uri().path();
        self.public_routes.contains(matched.as_str())
            || self.public_prefixes.iter().any(|prefix| path_under_prefix(path, prefix))
    }
}

/// Authenticate requests via bearer token
///
/// Public routes pass untouched. Everything else needs a valid token whose
/// identity is inserted into the request extensions for the handler.
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, Failure> {
    if gate.is_public(&request) {
        return Ok(next.run(request).await);
    }

    let identity = bearer_token(request.headers())
        .and_then(|token| gate.jwt.verify(token))
        .inspect_err(|e| tracing::debug!(error = %e, "bearer authentication failed"))?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use armature_core::{Claims, Identity, RaisedFailure};
    use axum::Router;
    use axum::body::Body;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use http::StatusCode;
    use http::header::AUTHORIZATION;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::routes::{Access, RouteTable};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(&SecretString::from(SECRET), Duration::from_secs(60)).unwrap())
    }

    fn app() -> Router {
        let (router, public) = RouteTable::new()
            .route("/open", get(|| async { "open" }), Access::Public)
            .route("/me", get(|identity: Identity| async move { identity.subject().to_owned() }), Access::Protected)
            .neutral_route("/status/live", get(|| async { "live" }), Access::Protected)
            .neutral_route("/statusboard", get(|| async { "board" }), Access::Protected)
            .build("/v1");

        let gate = AuthGate::new(jwt(), public, vec!["/status".to_owned()]);
        router.route_layer(from_fn_with_state(gate, auth_middleware))
    }

    async fn get_with(uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut request = http::Request::builder().uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        app().oneshot(request.body(Body::empty()).unwrap()).await.unwrap()
    }

    fn failure_name(response: &axum::response::Response) -> Option<String> {
        response
            .extensions()
            .get::<RaisedFailure>()
            .map(|raised| raised.0.name().to_owned())
    }

    #[tokio::test]
    async fn public_route_needs_no_token() {
        assert_eq!(get_with("/v1/open", None).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn public_prefix_needs_no_token() {
        assert_eq!(get_with("/status/live", None).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn public_prefix_does_not_cover_sibling_paths() {
        let response = get_with("/statusboard", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(failure_name(&response).as_deref(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = get_with("/v1/me", None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(failure_name(&response).as_deref(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_identity() {
        let token = jwt()
            .sign(&Claims {
                subject: Some("user-7".to_owned()),
                ..Claims::default()
            })
            .unwrap();

        let response = get_with("/v1/me", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "user-7");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let response = get_with("/v1/me", Some("nope")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_gated() {
        let response = get_with("/v1/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(failure_name(&response).is_none());
    }
}
