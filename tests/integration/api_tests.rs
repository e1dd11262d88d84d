//! API tests against the router over an in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use gauge_server::{api, store::memory::MemoryStore, AppConfig, AppState};

const ADMIN: &str = "Bearer 0000";

fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryStore::new()));
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, admin: bool, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri));
    if admin {
        builder = builder.header(header::AUTHORIZATION, ADMIN);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn add_gauge(app: &Router, id: &str, category: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        "/gauges",
        true,
        Some(json!({ "id": id, "category": category, "spec": "0-25mm" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", false, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", false, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_lending_cycle() {
    let app = app();
    add_gauge(&app, "G-100", "Micrometer").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/gauges/G-100/borrow",
        false,
        Some(json!({ "user": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "borrowed");
    assert_eq!(body["current_holder"], "Alice");
    assert_eq!(body["days_borrowed"], 0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/gauges/G-100/return-request",
        false,
        Some(json!({ "user": "Carol" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "InvalidTransition");

    let (status, body) = send(
        &app,
        Method::POST,
        "/gauges/G-100/return-request",
        false,
        Some(json!({ "user": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending_return");

    let (_, pending) = send(&app, Method::GET, "/gauges/pending", true, None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/gauges/G-100/confirm-return",
        true,
        Some(json!({ "note": "minor scratch" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
    assert_eq!(body["current_holder"], "");
    assert_eq!(body["note"], "minor scratch");

    let (status, log) = send(&app, Method::GET, "/logs", true, None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<_> = log
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["confirm_return", "request_return", "borrow"]);
}

#[tokio::test]
async fn test_admin_routes_need_password() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/gauges",
        false,
        Some(json!({ "id": "G-1", "category": "Caliper" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/logs")
        .header(header::AUTHORIZATION, "Bearer 1234")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_confirm_without_pending_return() {
    let app = app();
    add_gauge(&app, "G-1", "Caliper").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/gauges/G-1/confirm-return",
        true,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/gauges/G-404/borrow",
        false,
        Some(json!({ "user": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filtered_views() {
    let app = app();
    add_gauge(&app, "M-1", "Micrometer").await;
    add_gauge(&app, "C-1", "Caliper").await;
    add_gauge(&app, "C-2", "Caliper").await;
    send(
        &app,
        Method::POST,
        "/gauges/C-1/borrow",
        false,
        Some(json!({ "user": "Bob" })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/gauges/available?category=Caliper", false, None).await;
    let ids: Vec<_> = body.as_array().unwrap().iter().map(|g| g["id"].clone()).collect();
    assert_eq!(ids, [json!("C-2")]);

    let (_, body) = send(&app, Method::GET, "/gauges/in-flight?holder=Bob", false, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, Method::GET, "/gauges/categories", false, None).await;
    assert_eq!(body, json!(["Micrometer", "Caliper"]));

    let (_, body) = send(&app, Method::GET, "/gauges/holders", false, None).await;
    assert_eq!(body, json!(["Bob"]));

    let (_, body) = send(&app, Method::GET, "/gauges/borrowed", true, None).await;
    assert_eq!(body[0]["id"], "C-1");
}

#[tokio::test]
async fn test_user_directory() {
    let app = app();

    let (status, _) = send(&app, Method::POST, "/users", true, Some(json!({ "name": "Bob" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/users", true, Some(json!({ "name": "Bob" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (status, _) = send(&app, Method::POST, "/users", true, Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/users", false, None).await;
    assert_eq!(body, json!([{ "name": "Bob" }]));

    let (status, _) = send(&app, Method::DELETE, "/users/Bob", true, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, "/users/Bob", true, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_gauge() {
    let app = app();
    add_gauge(&app, "G-1", "Caliper").await;

    let (status, _) = send(&app, Method::DELETE, "/gauges/G-1", true, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/gauges", false, None).await;
    assert_eq!(body, json!([]));
}
