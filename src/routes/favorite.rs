// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite routes: toggle, list and check bookmarks.

use crate::error::{AppError, Result};
use crate::models::RouteRecord;
use crate::routes::{is_truthy, json_body, non_empty, parse_route_id, string_or_number};
use crate::services::path_codec;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/toggle_favorite", post(toggle_favorite))
        .route("/favorites", get(list_favorites))
        .route("/is_favorite", post(is_favorite))
}

#[derive(Deserialize)]
struct ToggleRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
    #[serde(default)]
    route_id: Value,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ToggleResponse {
    pub message: String,
    pub is_favorite: bool,
}

/// Add the route to the user's favorites, or remove it if already there.
async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ToggleRequest>, JsonRejection>,
) -> Result<Json<ToggleResponse>> {
    let req = json_body(payload)?;

    let Some(user_id) = non_empty(&req.user_id).filter(|_| is_truthy(&req.route_id)) else {
        return Err(AppError::BadRequest(
            "user_id and route_id are required.".to_string(),
        ));
    };

    let route_not_found = || AppError::NotFound("Route not found.".to_string());
    let route_id = parse_route_id(&req.route_id).ok_or_else(route_not_found)?;
    if state.db.get_route(route_id).await?.is_none() {
        return Err(route_not_found());
    }

    let is_favorite = state.db.toggle_favorite(user_id, route_id).await?;
    tracing::info!(user_id, route_id, is_favorite, "Favorite toggled");

    let message = if is_favorite {
        "Added to favorites."
    } else {
        "Removed from favorites."
    };
    Ok(Json(ToggleResponse {
        message: message.to_string(),
        is_favorite,
    }))
}

#[derive(Deserialize)]
struct FavoritesQuery {
    user_id: Option<String>,
    category: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoritesResponse {
    pub favorites: Vec<RouteRecord>,
}

/// The user's favorited routes in the order they were added.
async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FavoritesQuery>,
) -> Result<Json<FavoritesResponse>> {
    let user_id = non_empty(&params.user_id)
        .ok_or_else(|| AppError::BadRequest("No user_id was provided.".to_string()))?;

    let favorites = state
        .db
        .favorite_routes(user_id, non_empty(&params.category))
        .await?
        .into_iter()
        .map(|route| route.into_record().with_favorite(true))
        .collect();

    Ok(Json(FavoritesResponse { favorites }))
}

#[derive(Deserialize)]
struct IsFavoriteRequest {
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
    #[serde(default)]
    route_id: Value,
    #[serde(default)]
    route_path: Value,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IsFavoriteResponse {
    pub is_favorite: bool,
}

/// Check a favorite by route id, or failing that by exact path content.
async fn is_favorite(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<IsFavoriteRequest>, JsonRejection>,
) -> Result<Json<IsFavoriteResponse>> {
    let req = json_body(payload)?;

    let user_id = non_empty(&req.user_id)
        .ok_or_else(|| AppError::BadRequest("user_id is required.".to_string()))?;

    if !req.route_id.is_null() {
        let is_favorite = match parse_route_id(&req.route_id) {
            Some(route_id) => state.db.get_favorite(user_id, route_id).await?.is_some(),
            None => false,
        };
        return Ok(Json(IsFavoriteResponse { is_favorite }));
    }

    if !req.route_path.is_null() {
        // Stringified paths compare by their decoded content.
        let wanted = path_codec::decode_or(Some(&req.route_path), req.route_path.clone());
        let is_favorite = state
            .db
            .favorite_routes(user_id, None)
            .await?
            .iter()
            .any(|route| path_codec::same_path(&route.decoded_path(), &wanted));
        return Ok(Json(IsFavoriteResponse { is_favorite }));
    }

    Err(AppError::BadRequest(
        "Either route_id or route_path must be provided.".to_string(),
    ))
}
