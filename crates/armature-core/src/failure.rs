use std::borrow::Cow;
use std::sync::Arc;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::{Map, Value};

use crate::catalog::{self, ErrorCatalog};
use crate::classify::classify;
use crate::envelope::ResponseError;

/// Every failure that can reach the HTTP boundary
///
/// Handlers and middleware return `Result<_, Failure>`. The variant is the
/// classification discriminant, ordered from most to least informative.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// Raised by business logic with a symbolic code, translated via the catalog
    #[error(transparent)]
    Service(ServiceError),

    /// Raised by code that already knows the HTTP semantics
    #[error(transparent)]
    Http(HttpFailure),

    /// Request parsing and guard failures with a fixed catalog entry
    #[error(transparent)]
    Framework(FrameworkError),

    /// Anything else; never exposed to the caller
    #[error(transparent)]
    Unknown(UnknownError),
}

impl Failure {
    pub fn framework(kind: FrameworkKind, message: Option<String>) -> Self {
        Self::Framework(FrameworkError { kind, message })
    }

    pub fn not_found() -> Self {
        Self::framework(FrameworkKind::NotFound, None)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::framework(FrameworkKind::BadRequest, Some(message.into()))
    }

    pub fn unauthorized() -> Self {
        Self::framework(FrameworkKind::Unauthorized, None)
    }

    pub fn forbidden() -> Self {
        Self::framework(FrameworkKind::Forbidden, None)
    }

    /// Wrap an arbitrary error, naming it after its concrete type
    pub fn unknown<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let full = std::any::type_name::<E>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self::Unknown(UnknownError {
            name: Cow::Owned(name.to_owned()),
            error: anyhow::Error::new(error),
        })
    }

    /// A panic caught while handling a request
    pub fn panic(message: impl Into<String>) -> Self {
        Self::Unknown(UnknownError {
            name: Cow::Borrowed("Panic"),
            error: anyhow::anyhow!("panic: {}", message.into()),
        })
    }

    /// Kind name reported in the debug block of error envelopes
    pub fn name(&self) -> &str {
        match self {
            Self::Service(_) => "ServiceError",
            Self::Http(_) => "HttpFailure",
            Self::Framework(error) => error.kind.as_ref(),
            Self::Unknown(error) => &error.name,
        }
    }
}

impl From<ServiceError> for Failure {
    fn from(error: ServiceError) -> Self {
        Self::Service(error)
    }
}

impl From<HttpFailure> for Failure {
    fn from(error: HttpFailure) -> Self {
        Self::Http(error)
    }
}

impl From<FrameworkError> for Failure {
    fn from(error: FrameworkError) -> Self {
        Self::Framework(error)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(UnknownError {
            name: Cow::Borrowed("Error"),
            error,
        })
    }
}

impl From<axum::extract::rejection::JsonRejection> for Failure {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

/// Domain failure carrying only a symbolic code and payload
#[derive(Debug, Clone, thiserror::Error)]
#[error("service error `{error_code}`")]
pub struct ServiceError {
    pub error_code: String,
    pub data: Value,
}

impl ServiceError {
    pub fn new(error_code: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            data: Value::Object(Map::new()),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Failure whose HTTP translation is chosen by the raiser
///
/// Missing status, code or message fall back to the internal error
/// definition field by field.
#[derive(Debug, Clone, thiserror::Error)]
#[error("http failure {error_code:?} ({status_code:?})")]
pub struct HttpFailure {
    pub status_code: Option<StatusCode>,
    pub error_code: Option<String>,
    pub message: Option<String>,
    pub data: Value,
    /// Extra context shown only outside production
    pub debug_data: Option<Value>,
}

impl HttpFailure {
    pub fn new(status_code: StatusCode, error_code: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            error_code: Some(error_code.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_debug_data(mut self, debug_data: Value) -> Self {
        self.debug_data = Some(debug_data);
        self
    }
}

impl Default for HttpFailure {
    fn default() -> Self {
        Self {
            status_code: None,
            error_code: None,
            message: None,
            data: Value::Object(Map::new()),
            debug_data: None,
        }
    }
}

/// The four request-level failure kinds with a fixed catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
pub enum FrameworkKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
}

impl FrameworkKind {
    /// Catalog code this kind maps to
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::NotFound => catalog::NOT_FOUND,
            Self::BadRequest => catalog::BAD_REQUEST,
            Self::Unauthorized => catalog::UNAUTHORIZED,
            Self::Forbidden => catalog::FORBIDDEN,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("no message"))]
pub struct FrameworkError {
    pub kind: FrameworkKind,
    /// Overrides the catalog message when present and non-empty
    pub message: Option<String>,
}

/// Unexpected failure, kept for the server log only
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct UnknownError {
    pub name: Cow<'static, str>,
    pub error: anyhow::Error,
}

/// Response extension carrying the failure that produced an error response
///
/// The exception filter picks this up to re-render the body with request
/// metadata, the configured catalog and the deployment environment.
#[derive(Debug, Clone)]
pub struct RaisedFailure(pub Arc<Failure>);

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let classification = classify(&self, ErrorCatalog::builtin());
        let status = classification.status;
        let body = ResponseError::new(classification, None);

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(RaisedFailure(Arc::new(self)));
        response
    }
}
