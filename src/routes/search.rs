// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discovery routes: random pick and category search.

use crate::error::{AppError, Result};
use crate::models::RouteRecord;
use crate::routes::{is_truthy, json_body, non_empty, string_or_number, with_nicknames};
use crate::services::{CategoryFilter, CategorySelection};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/random_user_route", get(random_user_route))
        .route("/search_routes", post(search_routes))
}

#[derive(Deserialize)]
struct RandomQuery {
    category: Option<String>,
}

/// One route picked uniformly at random, optionally among those carrying
/// one of the requested category tags.
async fn random_user_route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomQuery>,
) -> Result<Json<RouteRecord>> {
    let filter = CategoryFilter::parse(params.category.as_deref());

    let candidates = match &filter {
        CategoryFilter::All => state.db.list_routes(None).await?,
        CategoryFilter::Tags(tags) => state.db.routes_with_any_tag(tags).await?,
    };

    let picked = candidates.choose(&mut rand::rng()).cloned();
    let Some(route) = picked else {
        let message = match filter {
            CategoryFilter::All => "No routes have been registered.",
            CategoryFilter::Tags(_) => "No routes match the given conditions.",
        };
        return Err(AppError::NotFound(message.to_string()));
    };

    tracing::debug!(
        route_id = route.id,
        candidates = candidates.len(),
        "Random route picked"
    );

    let record = with_nicknames(&state.db, vec![route])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Route vanished while loading")))?;
    Ok(Json(record))
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    categories: Value,
    #[serde(default, rename = "onlyFavorites", alias = "only_favorites")]
    only_favorites: Value,
    #[serde(default, deserialize_with = "string_or_number")]
    user_id: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchResponse {
    pub routes: Vec<RouteRecord>,
}

/// Routes matching every requested category axis.
///
/// Within one axis any listed tag matches. With `onlyFavorites` the result
/// is limited to the user's favorites.
async fn search_routes(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let req = json_body(payload)?;

    let selection = CategorySelection::from_json(&req.categories).ok_or_else(|| {
        AppError::BadRequest("Categories are missing or not in the expected format.".to_string())
    })?;

    let favorites_of = if is_truthy(&req.only_favorites) {
        let user_id = non_empty(&req.user_id).ok_or_else(|| {
            AppError::BadRequest("The favorites filter requires user_id.".to_string())
        })?;
        Some(user_id)
    } else {
        None
    };

    let routes = state.db.search_routes(&selection, favorites_of).await?;
    if routes.is_empty() {
        return Err(AppError::NotFound(
            "No routes match the given conditions.".to_string(),
        ));
    }

    tracing::debug!(
        matches = routes.len(),
        only_favorites = favorites_of.is_some(),
        "Route search"
    );

    let routes = with_nicknames(&state.db, routes).await?;
    Ok(Json(SearchResponse { routes }))
}
