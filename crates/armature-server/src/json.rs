use armature_core::Failure;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};

/// `axum::Json` whose rejection is a `BadRequest` failure
///
/// Malformed or oversized bodies produce the regular error envelope instead
/// of axum's plain text rejection.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(Failure))]
pub struct ApiJson<T>(pub T);

impl<T> IntoResponse for ApiJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use armature_core::RaisedFailure;
    use axum::Router;
    use axum::body::Body;
    use axum::routing::post;
    use http::StatusCode;
    use http::header::CONTENT_TYPE;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Item {
        name: String,
    }

    fn app() -> Router {
        Router::new().route("/items", post(|ApiJson(item): ApiJson<Item>| async move { item.name }))
    }

    async fn post_json(body: &'static str) -> Response {
        app()
            .oneshot(
                http::Request::builder()
                    .method("POST")
                    .uri("/items")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_is_extracted() {
        assert_eq!(post_json(r#"{"name":"widget"}"#).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request_failure() {
        let response = post_json("{not json").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let raised = response.extensions().get::<RaisedFailure>().unwrap();
        assert_eq!(raised.0.name(), "BadRequest");
    }
}
