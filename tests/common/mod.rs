// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use walkcanvas::config::Config;
use walkcanvas::db::Db;
use walkcanvas::routes::create_router;
use walkcanvas::AppState;

/// Create a test app backed by a fresh in-memory database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (Router, Arc<AppState>) {
    let db = Db::in_memory()
        .await
        .expect("Failed to open in-memory database");
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
    });

    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and return status plus parsed body.
///
/// Bodies that are not JSON come back as `Value::Null`.
#[allow(dead_code)]
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

#[allow(dead_code)]
pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Register an account through the API.
#[allow(dead_code)]
pub async fn register(app: &Router, id: &str, password: &str, nickname: &str) {
    let (status, body) = post(
        app,
        "/register",
        serde_json::json!({"ID": id, "PW": password, "NAME": nickname, "SEX": "F"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true, "registration of {} failed", id);
}

/// Save a route through the API and return its id.
#[allow(dead_code)]
pub async fn add_route(app: &Router, user_id: &str, name: &str, category: Value) -> i64 {
    let (status, body) = post(
        app,
        "/add_route",
        serde_json::json!({
            "user_id": user_id,
            "route_name": name,
            "route_path": [[37.5665, 126.978], [37.5651, 126.9895]],
            "category": category,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add_route failed: {}", body);
    body["id"].as_i64().expect("add_route returned no id")
}
