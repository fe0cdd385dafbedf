//! HTTP adapter tests: real axum requests funnelled into the dispatcher.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rentals_backend::{app::create_router, app_state::AppState, db::MemoryRentalStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(Arc::new(MemoryRentalStore::new())))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("failed to make request");
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = serde_json::from_slice(&body_bytes).expect("response should be valid JSON");
    (status, headers, body)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn health_over_http() {
    let app = app();
    let (status, headers, body) = call(&app, request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn preflight_over_http() {
    let app = app();
    let (status, headers, body) = call(&app, request("OPTIONS", "/anything/at/all", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(
        headers["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn property_lifecycle_over_http() {
    let app = app();

    let (status, _, created) = call(
        &app,
        request("POST", "/properties", Some(json!({ "address": "11 Lock St", "notes": "loft" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["property_id"].as_str().unwrap().to_string();

    let (status, _, listed) = call(&app, request("GET", "/properties", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _, _) = call(
        &app,
        request("PUT", &format!("/properties?id={id}"), Some(json!({ "status": "listed" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, property) = call(&app, request("GET", &format!("/properties/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(property["status"], "LISTED");
    assert_eq!(property["notes"], "loft");

    let (status, _, deleted) = call(&app, request("DELETE", &format!("/properties/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "ok": true, "deleted_id": id }));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/tenants")
        .body(Body::from("{\"full_name\": "))
        .unwrap();

    let (status, _, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid JSON body"));
}

#[tokio::test]
async fn unmatched_route_over_http() {
    let app = app();
    let (status, _, body) = call(&app, request("GET", "/owners", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "unknown route", "path": "/owners", "method": "GET" })
    );
}

#[tokio::test]
async fn oversized_body_gets_json_error_with_cors() {
    let app = app();
    let notes = "x".repeat(3 * 1024 * 1024);
    let payload = json!({ "address": "1 Main St", "notes": notes });

    let (status, headers, body) = call(&app, request("POST", "/properties", Some(payload))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(body["error"].as_str().unwrap().contains("length limit exceeded"));
}
