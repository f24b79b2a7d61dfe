// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use walkcanvas::error::AppError;

async fn body_of(err: AppError) -> (u16, Value) {
    let response = err.into_response();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_client_errors_echo_message() {
    let (status, body) = body_of(AppError::NotFound("Route not found.".to_string())).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "not_found", "message": "Route not found."}));

    let (status, body) = body_of(AppError::BadRequest("user_id is required.".to_string())).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_server_errors_include_cause() {
    let (status, body) = body_of(AppError::Database("disk I/O error".to_string())).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "database_error");
    assert!(body["message"].as_str().unwrap().contains("disk I/O error"));

    let (status, body) = body_of(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, 500);
    assert!(body["message"].as_str().unwrap().contains("boom"));
}

#[test]
fn test_validation_errors_are_bad_requests() {
    let err: AppError = validator::ValidationErrors::new().into();
    assert!(matches!(err, AppError::BadRequest(_)));
}
