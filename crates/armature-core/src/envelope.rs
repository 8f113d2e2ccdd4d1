//! Uniform JSON response bodies

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::classify::Classification;

/// Successful response body
///
/// `{ "success": true, "status": 200, "message": "...", "data": ... }`
///
/// Data that serializes to `null` (`()`, `None`, `Value::Null`) is written
/// as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "T: Serialize"))]
pub struct ResponseSuccess<T> {
    success: bool,
    pub status: u16,
    pub message: String,
    #[serde(serialize_with = "null_as_empty_object")]
    pub data: T,
}

fn null_as_empty_object<T, S>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: serde::Serializer,
{
    match serde_json::to_value(data).map_err(serde::ser::Error::custom)? {
        Value::Null => serializer.collect_map(std::iter::empty::<((), ())>()),
        value => value.serialize(serializer),
    }
}

impl<T> ResponseSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// `200 OK` envelope
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub const fn success(&self) -> bool {
        self.success
    }
}

impl<T: Serialize> IntoResponse for ResponseSuccess<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Error response body
///
/// `debug` is only present outside production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseError<T = Value> {
    success: bool,
    pub status: u16,
    pub error_code: String,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl ResponseError<Value> {
    pub fn new(classification: Classification, debug: Option<DebugInfo>) -> Self {
        Self {
            success: false,
            status: classification.status.as_u16(),
            error_code: classification.error_code,
            message: classification.message,
            data: classification.data,
            debug,
        }
    }
}

impl<T> ResponseError<T> {
    pub const fn success(&self) -> bool {
        self.success
    }
}

/// Diagnostics attached to error envelopes in non-production deployments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    /// ISO-8601 time the failure was rendered
    pub timestamp: String,
    pub path: String,
    pub method: String,
    pub error_name: String,
    #[serde(rename = "debugData", skip_serializing_if = "Option::is_none")]
    pub debug_data: Option<Value>,
}
