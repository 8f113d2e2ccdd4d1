//! Error envelope tests across every failure kind

mod harness;

use armature_config::ByteSize;
use harness::config::ConfigBuilder;
use harness::routes;
use harness::server::TestServer;
use serde_json::json;

async fn start(builder: ConfigBuilder) -> TestServer {
    TestServer::start_with_routes(builder.build(), routes::demo()).await.unwrap()
}

#[tokio::test]
async fn service_error_resolves_through_catalog() {
    let server = start(ConfigBuilder::new().production()).await;

    let (status, body) = server.get_json("/v1/items/missing", None).await;

    assert_eq!(status, 404);
    assert_eq!(
        body,
        json!({
            "success": false,
            "status": 404,
            "error_code": "NOT_FOUND",
            "message": "Requested resource is not found.",
            "data": {}
        })
    );
}

#[tokio::test]
async fn unknown_error_is_masked() {
    let server = start(ConfigBuilder::new().production()).await;

    let (status, body) = server.get_json("/v1/boom", None).await;

    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({
            "success": false,
            "status": 500,
            "error_code": "INTERNAL_SERVER_ERROR",
            "message": "An unexpected error occurred on the server.",
            "data": {}
        })
    );
    assert!(!body.to_string().contains("boom"));
}

#[tokio::test]
async fn http_failure_fields_are_mirrored() {
    let server = start(ConfigBuilder::new().production()).await;

    let (status, body) = server.get_json("/v1/forbid", None).await;

    assert_eq!(status, 403);
    assert_eq!(
        body,
        json!({
            "success": false,
            "status": 403,
            "error_code": "CUSTOM_FORBID",
            "message": "no access",
            "data": { "reason": "role" }
        })
    );
}

#[tokio::test]
async fn panic_becomes_internal_error() {
    let server = start(ConfigBuilder::new().production()).await;

    let (status, body) = server.get_json("/v1/explode", None).await;

    assert_eq!(status, 500);
    assert_eq!(body["error_code"], "INTERNAL_SERVER_ERROR");
    assert!(!body.to_string().contains("exploded"));

    // The server keeps serving after a panic
    let (status, _) = server.get_json("/v1/open", None).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn unknown_route_is_not_found_even_without_token() {
    let server = start(ConfigBuilder::new()).await;

    let (status, body) = server.get_json("/v1/does-not-exist", None).await;

    assert_eq!(status, 404);
    assert_eq!(body["error_code"], "NOT_FOUND");
    assert_eq!(body["message"], "Requested resource is not found.");
}

#[tokio::test]
async fn unsupported_method_is_a_not_found_envelope() {
    let server = start(ConfigBuilder::new().production()).await;

    let resp = server.client().post(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.headers().get("content-type").and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "status": 404,
            "error_code": "NOT_FOUND",
            "message": "Requested resource is not found.",
            "data": {}
        })
    );
}

#[tokio::test]
async fn unsupported_method_on_versioned_route_is_an_envelope() {
    let server = start(ConfigBuilder::new()).await;

    let resp = server.client().delete(server.url("/v1/items")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error_code"], "NOT_FOUND");
    assert_eq!(body["debug"]["method"], "DELETE");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = start(ConfigBuilder::new()).await;

    let resp = server
        .client()
        .post(server.url("/v1/items"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error_code"], "BAD_REQUEST");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn valid_json_is_accepted() {
    let server = start(ConfigBuilder::new()).await;

    let resp = server
        .client()
        .post(server.url("/v1/items"))
        .json(&json!({ "name": "widget" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 201);
    assert_eq!(body["data"], json!({ "name": "widget" }));
}

#[tokio::test]
async fn oversized_body_is_bad_request() {
    let server = start(ConfigBuilder::new().with_json_body_limit(ByteSize(16))).await;

    let resp = server
        .client()
        .post(server.url("/v1/items"))
        .json(&json!({ "name": "a name well beyond sixteen bytes" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error_code"], "BAD_REQUEST");
}

#[tokio::test]
async fn configured_error_code_is_resolved() {
    let config = ConfigBuilder::new()
        .production()
        .with_error("QUOTA_EXCEEDED", 429, "Quota exceeded.");
    let server = start(config).await;

    let (status, body) = server.get_json("/v1/quota", None).await;

    assert_eq!(status, 429);
    assert_eq!(body["error_code"], "QUOTA_EXCEEDED");
    assert_eq!(body["message"], "Quota exceeded.");
    assert_eq!(body["data"], json!({ "limit": 10 }));
}

#[tokio::test]
async fn unregistered_error_code_is_internal() {
    let server = start(ConfigBuilder::new().production()).await;

    let (status, body) = server.get_json("/v1/quota", None).await;

    assert_eq!(status, 500);
    assert_eq!(body["error_code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(body["data"], json!({ "limit": 10 }));
}

#[tokio::test]
async fn production_omits_debug_block() {
    let server = start(ConfigBuilder::new().production()).await;

    let (_, body) = server.get_json("/v1/forbid", None).await;

    assert!(body.get("debug").is_none());
}

#[tokio::test]
async fn development_adds_debug_block() {
    let server = start(ConfigBuilder::new()).await;

    let (status, body) = server.get_json("/v1/forbid?verbose=1", None).await;

    assert_eq!(status, 403);
    let debug = &body["debug"];
    assert_eq!(debug["path"], "/v1/forbid?verbose=1");
    assert_eq!(debug["method"], "GET");
    assert_eq!(debug["error_name"], "HttpFailure");
    assert_eq!(debug["debugData"], json!({ "rule": "admin-only" }));
    assert!(debug["timestamp"].as_str().is_some_and(|t| t.contains('T')));
}

#[tokio::test]
async fn development_debug_names_the_unknown_error() {
    let server = start(ConfigBuilder::new()).await;

    let (_, body) = server.get_json("/v1/boom", None).await;

    assert_eq!(body["debug"]["error_name"], "Boom");
    assert_eq!(body["message"], "An unexpected error occurred on the server.");
}
