// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route routes: save, list, fetch the latest and delete walking routes.

use crate::error::{AppError, Result};
use crate::models::{NewRoute, RouteRecord};
use crate::routes::{is_truthy, json_body, non_empty, string_or_number, with_nicknames};
use crate::services::{category, path_codec};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add_route", post(add_route))
        .route("/recent_route", get(recent_route))
        .route("/save_recent_route", post(save_recent_route))
        .route("/delete_route/{route_id}", delete(delete_route))
        .route("/routes", get(list_routes))
}

// ─── Save ────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct AddRouteRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    #[validate(length(max = 80))]
    user_id: Option<String>,
    #[validate(length(max = 120))]
    route_name: Option<String>,
    #[serde(default)]
    route_path: Value,
    category: Option<Value>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddRouteResponse {
    pub message: String,
    pub route_name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
}

/// Save a new route.
///
/// `route_path` may be a JSON list or a string holding one; anything that
/// does not decode to a list is rejected.
async fn add_route(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AddRouteRequest>, JsonRejection>,
) -> Result<Json<AddRouteResponse>> {
    let req = json_body(payload)?;
    req.validate()?;

    let (Some(user_id), Some(route_name)) = (non_empty(&req.user_id), non_empty(&req.route_name))
    else {
        return Err(missing_route_fields());
    };
    if !is_truthy(&req.route_path) {
        return Err(missing_route_fields());
    }

    let points = match path_codec::decode(Some(&req.route_path)) {
        Some(Value::Array(points)) => points,
        _ => {
            return Err(AppError::BadRequest(
                "Failed to save route: data format error (route_path must be a list).".to_string(),
            ))
        }
    };

    let new_route = NewRoute {
        user_id: user_id.to_string(),
        route_name: route_name.to_string(),
        route_path: path_codec::encode(&points),
        tags: category::route_tags(req.category.as_ref()),
    };
    let id = state.db.insert_route(&new_route).await?;

    tracing::info!(
        route_id = id,
        user_id,
        points = points.len(),
        "Route saved"
    );

    Ok(Json(AddRouteResponse {
        message: "Route saved successfully.".to_string(),
        route_name: new_route.route_name,
        id,
    }))
}

fn missing_route_fields() -> AppError {
    AppError::BadRequest("Route name, coordinates and user ID are required.".to_string())
}

/// Acknowledge a recent-route ping. Nothing is stored.
async fn save_recent_route() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─── Read ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UserQuery {
    user_id: Option<String>,
}

/// The user's most recently saved route.
async fn recent_route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<Json<RouteRecord>> {
    let user_id = non_empty(&params.user_id)
        .ok_or_else(|| AppError::BadRequest("user_id is required.".to_string()))?;

    let route = state
        .db
        .latest_route_for_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No recently used route.".to_string()))?;

    let record = with_nicknames(&state.db, vec![route])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Route vanished while loading")))?;
    Ok(Json(record))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutesResponse {
    pub routes: Vec<RouteRecord>,
}

/// All routes, or one user's routes, flagged with that user's favorites.
async fn list_routes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserQuery>,
) -> Result<Json<RoutesResponse>> {
    let user_id = non_empty(&params.user_id);

    let favorites = match user_id {
        Some(user_id) => match state.db.favorite_route_ids(user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Favorite lookup failed, listing without favorites");
                HashSet::new()
            }
        },
        None => HashSet::new(),
    };

    let routes = state
        .db
        .list_routes(user_id)
        .await?
        .into_iter()
        .map(|route| {
            let is_favorite = favorites.contains(&route.id);
            route.into_record().with_favorite(is_favorite)
        })
        .collect();

    Ok(Json(RoutesResponse { routes }))
}

// ─── Delete ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub message: String,
}

/// Delete a route along with every favorite pointing at it.
///
/// A non-numeric id cannot name a route, so it is reported as not found.
async fn delete_route(
    State(state): State<Arc<AppState>>,
    route_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Ok(Path(route_id)) = route_id else {
        return Err(AppError::NotFound("Route not found.".to_string()));
    };

    let favorites_removed = state
        .db
        .delete_route(route_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found.".to_string()))?;

    tracing::info!(route_id, favorites_removed, "Route deleted");

    Ok(Json(MessageResponse {
        message: "Route deleted successfully.".to_string(),
    }))
}
