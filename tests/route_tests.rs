// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route endpoint tests: saving, listing, recent route and deletion.

use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_add_route_accepts_list_and_string_paths() {
    let (app, state) = common::create_test_app().await;

    let (status, body) = common::post(
        &app,
        "/add_route",
        json!({"user_id": "u1", "route_name": "River loop", "route_path": [[1.0, 2.0]]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route_name"], "River loop");

    let (status, body) = common::post(
        &app,
        "/add_route",
        json!({"user_id": "u1", "route_name": "Hill walk", "route_path": "[[3.0, 4.0]]"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = state
        .db
        .get_route(body["id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.route_path.as_deref(), Some("[[3.0,4.0]]"));
}

#[tokio::test]
async fn test_add_route_missing_fields() {
    let (app, _state) = common::create_test_app().await;

    for body in [
        json!({"route_name": "x", "route_path": [[1, 2]]}),
        json!({"user_id": "u1", "route_path": [[1, 2]]}),
        json!({"user_id": "u1", "route_name": "x"}),
        json!({"user_id": "u1", "route_name": "x", "route_path": []}),
        json!({"user_id": "u1", "route_name": "x", "route_path": ""}),
    ] {
        let (status, _) = common::post(&app, "/add_route", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_add_route_rejects_non_list_path() {
    let (app, _state) = common::create_test_app().await;

    for path in [json!("{\"lat\": 1}"), json!("not json"), json!(17), json!({"a": 1})] {
        let (status, body) = common::post(
            &app,
            "/add_route",
            json!({"user_id": "u1", "route_name": "x", "route_path": path}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("data format error"));
    }
}

#[tokio::test]
async fn test_add_route_rejects_malformed_json() {
    let (app, _state) = common::create_test_app().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/add_route")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_route_stores_category_tags() {
    let (app, state) = common::create_test_app().await;

    let legacy = common::add_route(&app, "u1", "legacy", json!(4)).await;
    let axes = common::add_route(
        &app,
        "u1",
        "axes",
        json!({"지역": ["1"], "길 유형": 2, "이동수단": "3"}),
    )
    .await;

    let legacy = state.db.get_route(legacy).await.unwrap().unwrap();
    assert_eq!(legacy.category.as_deref(), Some("4"));
    assert_eq!(legacy.region_id, None);

    let axes = state.db.get_route(axes).await.unwrap().unwrap();
    assert_eq!(axes.category, None);
    assert_eq!(axes.region_id.as_deref(), Some("1"));
    assert_eq!(axes.road_type_id.as_deref(), Some("2"));
    assert_eq!(axes.transport_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn test_recent_route_is_latest_with_nickname() {
    let (app, _state) = common::create_test_app().await;
    common::register(&app, "u1", "p", "Walker").await;
    common::add_route(&app, "u1", "first", json!(null)).await;
    common::add_route(&app, "u1", "second", json!(null)).await;
    common::add_route(&app, "u2", "someone else", json!(null)).await;

    let (status, body) = common::get(&app, "/recent_route?user_id=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["route_name"], "second");
    assert_eq!(body["nickname"], "Walker");
    assert_eq!(body["route_path"], body["polyline"]);
    assert_eq!(body["route_path"], json!([[37.5665, 126.978], [37.5651, 126.9895]]));
}

#[tokio::test]
async fn test_recent_route_falls_back_to_raw_id() {
    let (app, _state) = common::create_test_app().await;
    common::add_route(&app, "ghost", "orphan", json!(null)).await;

    let (_, body) = common::get(&app, "/recent_route?user_id=ghost").await;
    assert_eq!(body["nickname"], "ghost");
}

#[tokio::test]
async fn test_recent_route_errors() {
    let (app, _state) = common::create_test_app().await;

    let (status, _) = common::get(&app, "/recent_route").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = common::get(&app, "/recent_route?user_id=nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_save_recent_route_acknowledges() {
    let (app, _state) = common::create_test_app().await;
    let (status, body) = common::post(&app, "/save_recent_route", json!({"anything": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_routes_flags_favorites() {
    let (app, _state) = common::create_test_app().await;
    let mine = common::add_route(&app, "u1", "mine", json!(null)).await;
    let theirs = common::add_route(&app, "u2", "theirs", json!(null)).await;
    common::post(&app, "/toggle_favorite", json!({"user_id": "u1", "route_id": theirs})).await;

    let (status, body) = common::get(&app, "/routes").await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r["is_favorite"] == false));

    let (_, body) = common::get(&app, "/routes?user_id=u1").await;
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["id"], mine);
    assert_eq!(routes[0]["is_favorite"], false);

    let (_, body) = common::get(&app, "/routes?user_id=u2").await;
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["id"], theirs);
    assert_eq!(routes[0]["is_favorite"], false);
}

#[tokio::test]
async fn test_delete_route_removes_favorites() {
    let (app, state) = common::create_test_app().await;
    let route_id = common::add_route(&app, "owner", "doomed", json!(null)).await;
    for fan in ["fan1", "fan2"] {
        common::post(&app, "/toggle_favorite", json!({"user_id": fan, "route_id": route_id})).await;
    }

    let (status, _) = common::send(&app, "DELETE", &format!("/delete_route/{}", route_id), None).await;
    assert_eq!(status, StatusCode::OK);

    let favorites: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_route")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(favorites, 0);
    assert!(state.db.get_route(route_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_failure_reports_500_and_keeps_rows() {
    let (app, state) = common::create_test_app().await;
    let route_id = common::add_route(&app, "owner", "locked", json!(null)).await;
    common::post(&app, "/toggle_favorite", json!({"user_id": "fan", "route_id": route_id})).await;

    sqlx::query(
        "CREATE TRIGGER lock_route BEFORE DELETE ON route \
         BEGIN SELECT RAISE(ABORT, 'route is locked'); END",
    )
    .execute(state.db.pool())
    .await
    .unwrap();

    let (status, body) =
        common::send(&app, "DELETE", &format!("/delete_route/{}", route_id), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
    assert!(body["message"].as_str().unwrap().contains("route is locked"));

    assert!(state.db.get_route(route_id).await.unwrap().is_some());
    assert!(state.db.get_favorite("fan", route_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_list_routes_survives_favorite_lookup_failure() {
    let (app, state) = common::create_test_app().await;
    let route_id = common::add_route(&app, "u1", "mine", json!(null)).await;
    common::post(&app, "/toggle_favorite", json!({"user_id": "u1", "route_id": route_id})).await;

    sqlx::query("ALTER TABLE favorite_route RENAME TO favorite_route_archive")
        .execute(state.db.pool())
        .await
        .unwrap();

    let (status, body) = common::get(&app, "/routes?user_id=u1").await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0]["id"], route_id);
    assert_eq!(routes[0]["is_favorite"], false);
}

#[tokio::test]
async fn test_add_route_accepts_numeric_user_id() {
    let (app, state) = common::create_test_app().await;
    let (status, body) = common::post(
        &app,
        "/add_route",
        json!({"user_id": 1001, "route_name": "numbered", "route_path": [[1, 2]]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = state
        .db
        .get_route(body["id"].as_i64().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, "1001");
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let (app, _state) = common::create_test_app().await;
    for uri in ["/health", "/recent_route"] {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        let headers = response.headers();
        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    }
}

#[tokio::test]
async fn test_delete_unknown_route_is_404_without_side_effects() {
    let (app, state) = common::create_test_app().await;
    let route_id = common::add_route(&app, "owner", "kept", json!(null)).await;
    common::post(&app, "/toggle_favorite", json!({"user_id": "fan", "route_id": route_id})).await;

    let (status, _) = common::send(&app, "DELETE", "/delete_route/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = common::send(&app, "DELETE", "/delete_route/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(state.db.get_route(route_id).await.unwrap().is_some());
    assert!(state.db.get_favorite("fan", route_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = common::create_test_app().await;
    let (status, body) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
