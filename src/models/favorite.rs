// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite (bookmark) join record.

use sqlx::FromRow;

/// One user's bookmark on one route.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRoute {
    pub id: i64,
    pub user_id: String,
    pub route_id: i64,
}
