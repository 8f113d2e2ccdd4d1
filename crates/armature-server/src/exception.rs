//! Turns every failure into the uniform error envelope

use std::any::Any;
use std::sync::Arc;

use armature_core::{
    DebugInfo, Environment, ErrorCatalog, Failure, FrameworkKind, RaisedFailure, ResponseError, classify,
};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};

/// Body written when the envelope itself cannot be serialized
const FALLBACK_BODY: &str = r#"{"success":false,"status":500,"error_code":"INTERNAL_SERVER_ERROR","message":"An unexpected error occurred on the server.","data":{}}"#;

/// Renders failures with the configured catalog and deployment environment
#[derive(Debug, Clone)]
pub struct ExceptionFilter {
    catalog: Arc<ErrorCatalog>,
    environment: Environment,
}

impl ExceptionFilter {
    pub const fn new(catalog: Arc<ErrorCatalog>, environment: Environment) -> Self {
        Self { catalog, environment }
    }

    /// Build the error response for `failure` raised while serving `method path`
    ///
    /// Logs one error event carrying the envelope and the failure itself.
    /// Never fails: serialization problems degrade to a fixed 500 body.
    pub fn render(&self, failure: &Failure, method: &Method, path: &str) -> Response {
        let classification = classify(failure, &self.catalog);

        if let Failure::Unknown(unknown) = failure {
            tracing::error!(kind = %unknown.name, error = ?unknown.error, "unhandled failure");
        }

        let debug = (!self.environment.is_production()).then(|| DebugInfo {
            timestamp: jiff::Timestamp::now().to_string(),
            path: path.to_owned(),
            method: method.to_string(),
            error_name: failure.name().to_owned(),
            debug_data: classification.debug_data.clone(),
        });

        let status = classification.status;
        let envelope = ResponseError::new(classification, debug);

        let (status, body) = match serde_json::to_string(&envelope) {
            Ok(body) => (status, body),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize error envelope");
                (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_owned())
            }
        };

        armature_telemetry::metrics::record_error(status.as_u16(), &envelope.error_code);

        tracing::error!(
            status = status.as_u16(),
            error_code = %envelope.error_code,
            response = %body,
            trace = ?failure,
            "{method} {path} failed"
        );

        (status, [(CONTENT_TYPE, HeaderValue::from_static("application/json"))], body).into_response()
    }
}

/// Replace responses produced by a [`Failure`] with the final envelope
pub async fn exception_middleware(State(filter): State<ExceptionFilter>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), ToString::to_string);

    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<RaisedFailure>() {
        Some(RaisedFailure(failure)) => filter.render(&failure, &method, &path),
        None => match failure_for_status(response.status()) {
            Some(failure) => filter.render(&failure, &method, &path),
            None => response,
        },
    }
}

/// Failure standing in for an error response no [`Failure`] produced
///
/// Covers axum's own rejections (path, query, body limit, method) so they
/// also leave as envelopes.
fn failure_for_status(status: StatusCode) -> Option<Failure> {
    if !(status.is_client_error() || status.is_server_error()) {
        return None;
    }

    let failure = match status {
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNPROCESSABLE_ENTITY => {
            Failure::framework(FrameworkKind::BadRequest, None)
        }
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => Failure::not_found(),
        StatusCode::UNAUTHORIZED => Failure::unauthorized(),
        StatusCode::FORBIDDEN => Failure::forbidden(),
        other => Failure::from(anyhow::anyhow!("unhandled {other} response")),
    };

    Some(failure)
}

/// Convert a handler panic into an `Unknown` failure response
///
/// Used with `CatchPanicLayer::custom`; the exception filter renders it.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());

    Failure::panic(message).into_response()
}
