//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use stampy::{api::create_router, AppState, CacheService};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = CacheService::new(4).unwrap();
    create_router(AppState::new(cache))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/v1/cache/test_key")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"value":"test_value"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_put_empty_value_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/v1/cache/k", Some(r#"{"value":""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/v1/cache/k", Some("not json")).await;
    assert!(status.is_client_error());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let (status, _) = send(&app, "PUT", "/v1/cache/a", Some(r#"{"value":"1"}"#)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, "GET", "/v1/cache/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "a");
    assert_eq!(json["value"], "1");
    assert!(json["creationDate"].is_string());
    assert!(json["lastAccessed"].is_string());
    assert!(json["expiryTime"].is_null());
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/v1/cache/nonexistent_key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("nonexistent_key"));
}

#[tokio::test]
async fn test_keys_may_contain_slashes() {
    let app = create_test_app();

    send(&app, "PUT", "/v1/cache/users/42/name", Some(r#"{"value":"ada"}"#)).await;

    let (status, json) = send(&app, "GET", "/v1/cache/users/42/name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "users/42/name");
    assert_eq!(json["value"], "ada");
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    send(&app, "PUT", "/v1/cache/a", Some(r#"{"value":"1"}"#)).await;

    let (status, _) = send(&app, "DELETE", "/v1/cache/a", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/v1/cache/a", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_absent_key_is_ok() {
    let app = create_test_app();

    let (status, _) = send(&app, "DELETE", "/v1/cache/never_there", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, "GET", "/v1/cache", None).await;
    assert_eq!(stats["keyDeletes"], 0);
}

// == Stats / Info / Health ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    send(&app, "PUT", "/v1/cache/k1", Some(r#"{"value":"v1"}"#)).await;
    send(&app, "PUT", "/v1/cache/k2", Some(r#"{"value":"v2"}"#)).await;
    send(&app, "PUT", "/v1/cache/t", Some(r#"{"value":"v","timeToLive":60}"#)).await;
    send(&app, "GET", "/v1/cache/k1", None).await;
    send(&app, "GET", "/v1/cache/t", None).await;
    send(&app, "GET", "/v1/cache/missing", None).await;
    send(&app, "DELETE", "/v1/cache/k2", None).await;

    let (status, json) = send(&app, "GET", "/v1/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keyPuts"], 2);
    assert_eq!(json["keyHits"], 2);
    assert_eq!(json["absentKeyHits"], 1);
    assert_eq!(json["keyDeletes"], 1);
    assert_eq!(json["expiredKeys"], 0);
    assert_eq!(json["expiredKeyHits"], 0);
}

#[tokio::test]
async fn test_info_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/v1/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["bucketCount"], 4);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["started"].is_string());
    assert!(json["memoryUsage"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

// == TTL via API ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    send(&app, "PUT", "/v1/cache/b", Some(r#"{"value":"x","timeToLive":1}"#)).await;

    let (status, json) = send(&app, "GET", "/v1/cache/b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "x");
    assert!(json["expiryTime"].is_string());

    tokio::time::sleep(Duration::from_secs(2)).await;

    let (status, _) = send(&app, "GET", "/v1/cache/b", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = send(&app, "GET", "/v1/cache", None).await;
    assert_eq!(stats["expiredKeyHits"], 1);
}

// == End-to-end over TCP ==

#[tokio::test]
async fn test_served_over_tcp() {
    let cache = CacheService::initialize(4, Duration::from_secs(60)).unwrap();
    let app = create_router(AppState::new(cache));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}/v1/cache", addr);

    let response = client
        .put(format!("{}/greeting", base))
        .json(&serde_json::json!({ "value": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let response = client
        .get(format!("{}/greeting", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["value"], "hello");

    let response = client.get(&base).send().await.unwrap();
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["keyPuts"], 1);
    assert_eq!(stats["keyHits"], 1);

    server.abort();
}
