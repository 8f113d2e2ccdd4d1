//! Application routes exercising every failure kind

use armature_core::{Failure, HttpFailure, Identity, ResponseSuccess, ServiceError};
use armature_server::{Access, ApiJson, RouteTable};
use axum::routing::{get, post};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
#[error("boom")]
pub struct Boom;

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
}

async fn missing_item() -> Result<ResponseSuccess<Value>, Failure> {
    Err(ServiceError::new("NOT_FOUND").into())
}

async fn boom() -> Result<ResponseSuccess<Value>, Failure> {
    Err(Failure::unknown(Boom))
}

async fn forbid() -> Result<ResponseSuccess<Value>, Failure> {
    Err(HttpFailure::new(StatusCode::FORBIDDEN, "CUSTOM_FORBID")
        .with_message("no access")
        .with_data(json!({ "reason": "role" }))
        .with_debug_data(json!({ "rule": "admin-only" }))
        .into())
}

async fn quota() -> Result<ResponseSuccess<Value>, Failure> {
    Err(ServiceError::new("QUOTA_EXCEEDED").with_data(json!({ "limit": 10 })).into())
}

#[allow(clippy::unused_async)]
async fn explode() -> ResponseSuccess<Value> {
    panic!("handler exploded")
}

async fn create(ApiJson(item): ApiJson<NewItem>) -> ResponseSuccess<Value> {
    ResponseSuccess::new(StatusCode::CREATED, "Item created.", json!({ "name": item.name }))
}

async fn open() -> ResponseSuccess<Value> {
    ResponseSuccess::ok("Open.", json!({ "open": true }))
}

async fn whoami(identity: Identity) -> ResponseSuccess<Value> {
    ResponseSuccess::ok(
        "Secret.",
        json!({ "sub": identity.subject(), "role": identity.claim("role") }),
    )
}

/// Demo table: failures are public so the handler itself raises them
pub fn demo() -> RouteTable {
    RouteTable::new()
        .route("/items/missing", get(missing_item), Access::Public)
        .route("/boom", get(boom), Access::Public)
        .route("/forbid", get(forbid), Access::Public)
        .route("/quota", get(quota), Access::Public)
        .route("/explode", get(explode), Access::Public)
        .route("/items", post(create), Access::Public)
        .route("/open", get(open), Access::Public)
        .route("/secret", get(whoami), Access::Protected)
        .neutral_route("/status/ping", get(open), Access::Protected)
        .neutral_route("/healthcheck-admin", get(whoami), Access::Protected)
}
