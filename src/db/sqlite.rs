// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and existence checks)
//! - Routes (saved walking routes and category search)
//! - Favorites (per-user bookmarks on routes)

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::config::Config;
use crate::db::SCHEMA;
use crate::error::AppError;
use crate::models::{FavoriteRoute, NewRoute, NewUser, Route, User};
use crate::services::category::CategorySelection;

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open a connection pool for the configured database URL.
    ///
    /// In-memory databases live only as long as their connection, so they
    /// get a single connection that is never recycled.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| AppError::Database(format!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = config.database_url.contains(":memory:")
            || config.database_url.contains("mode=memory");

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.database_max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        tracing::info!(in_memory, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Self::connect(&Config::test_default()).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Create tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!(statements = SCHEMA.len(), "Schema applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by external identifier.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, user_id, password, nickname, gender FROM user WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn user_exists(&self, user_id: &str) -> Result<bool, AppError> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM user WHERE user_id = ?)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found != 0)
    }

    pub async fn nickname_exists(&self, nickname: &str) -> Result<bool, AppError> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM user WHERE nickname = ?)")
                .bind(nickname)
                .fetch_one(&self.pool)
                .await?;
        Ok(found != 0)
    }

    /// Insert a user. Returns `false` when the identifier is already taken.
    pub async fn insert_user(&self, user: &NewUser) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user (user_id, password, nickname, gender)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.password_digest)
        .bind(&user.nickname)
        .bind(&user.gender)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Overwrite password digest, nickname and gender. Returns `false` if no such user.
    pub async fn update_user(&self, user: &NewUser) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE user SET password = ?, nickname = ?, gender = ? WHERE user_id = ?",
        )
        .bind(&user.password_digest)
        .bind(&user.nickname)
        .bind(&user.gender)
        .bind(&user.user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Nicknames for the given identifiers. Unknown users and null nicknames are absent.
    pub async fn nicknames(&self, user_ids: &[String]) -> Result<HashMap<String, String>, AppError> {
        let unique: Vec<String> = user_ids
            .iter()
            .cloned()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT user_id, nickname FROM user WHERE ");
        push_in_list(&mut query, "user_id", &unique);

        let rows: Vec<(String, Option<String>)> =
            query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(user_id, nickname)| nickname.map(|n| (user_id, n)))
            .collect())
    }

    // ─── Route Operations ────────────────────────────────────────

    /// Insert a route and return its id.
    pub async fn insert_route(&self, route: &NewRoute) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO route
                (user_id, route_name, route_path, category, region_id, road_type_id, transport_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&route.user_id)
        .bind(&route.route_name)
        .bind(&route.route_path)
        .bind(&route.tags.category)
        .bind(&route.tags.region_id)
        .bind(&route.tags.road_type_id)
        .bind(&route.tags.transport_id)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_route(&self, route_id: i64) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            SELECT id, user_id, route_name, route_path, category, region_id, road_type_id, transport_id
            FROM route
            WHERE id = ?
            "#,
        )
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(route)
    }

    /// The user's most recently saved route (highest id).
    pub async fn latest_route_for_user(&self, user_id: &str) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            SELECT id, user_id, route_name, route_path, category, region_id, road_type_id, transport_id
            FROM route
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(route)
    }

    /// All routes, or only those owned by `user_id`.
    pub async fn list_routes(&self, user_id: Option<&str>) -> Result<Vec<Route>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, user_id, route_name, route_path, category, region_id, road_type_id, transport_id FROM route",
        );
        if let Some(user_id) = user_id {
            query.push(" WHERE user_id = ").push_bind(user_id.to_string());
        }
        query.push(" ORDER BY id");

        Ok(query.build_query_as::<Route>().fetch_all(&self.pool).await?)
    }

    /// Routes where any tag column holds one of `tags`.
    pub async fn routes_with_any_tag(&self, tags: &[String]) -> Result<Vec<Route>, AppError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, user_id, route_name, route_path, category, region_id, road_type_id, transport_id FROM route WHERE ",
        );
        push_any_tag(&mut query, "", tags);
        query.push(" ORDER BY id");

        Ok(query.build_query_as::<Route>().fetch_all(&self.pool).await?)
    }

    /// Routes matching every non-empty axis of `selection`, optionally
    /// restricted to the favorites of `favorites_of`.
    pub async fn search_routes(
        &self,
        selection: &CategorySelection,
        favorites_of: Option<&str>,
    ) -> Result<Vec<Route>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, user_id, route_name, route_path, category, region_id, road_type_id, transport_id FROM route WHERE 1 = 1",
        );

        for (column, tags) in [
            ("region_id", &selection.region),
            ("road_type_id", &selection.road_type),
            ("transport_id", &selection.transport),
        ] {
            if !tags.is_empty() {
                query.push(" AND ");
                push_in_list(&mut query, column, tags);
            }
        }

        if let Some(user_id) = favorites_of {
            query
                .push(" AND id IN (SELECT route_id FROM favorite_route WHERE user_id = ")
                .push_bind(user_id.to_string())
                .push(")");
        }
        query.push(" ORDER BY id");

        Ok(query.build_query_as::<Route>().fetch_all(&self.pool).await?)
    }

    /// Delete a route and every favorite pointing at it, atomically.
    ///
    /// Returns `None` when the route does not exist, otherwise the number of
    /// favorite rows removed with it.
    pub async fn delete_route(&self, route_id: i64) -> Result<Option<u64>, AppError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM route WHERE id = ?")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let favorites_removed = sqlx::query("DELETE FROM favorite_route WHERE route_id = ?")
            .bind(route_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM route WHERE id = ?")
            .bind(route_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(favorites_removed))
    }

    // ─── Favorite Operations ─────────────────────────────────────

    /// Ids of all routes the user has favorited.
    pub async fn favorite_route_ids(&self, user_id: &str) -> Result<HashSet<i64>, AppError> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT route_id FROM favorite_route WHERE user_id = ?")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(ids.into_iter().collect())
    }

    pub async fn get_favorite(
        &self,
        user_id: &str,
        route_id: i64,
    ) -> Result<Option<FavoriteRoute>, AppError> {
        let favorite = sqlx::query_as::<_, FavoriteRoute>(
            "SELECT id, user_id, route_id FROM favorite_route WHERE user_id = ? AND route_id = ?",
        )
        .bind(user_id)
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorite)
    }

    /// Flip the favorite state of a (user, route) pair. Returns the new state.
    pub async fn toggle_favorite(&self, user_id: &str, route_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM favorite_route WHERE user_id = ? AND route_id = ?")
            .bind(user_id)
            .bind(route_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let is_favorite = if removed > 0 {
            false
        } else {
            sqlx::query(
                r#"
                INSERT INTO favorite_route (user_id, route_id)
                VALUES (?, ?)
                ON CONFLICT (user_id, route_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(route_id)
            .execute(&mut *tx)
            .await?;
            true
        };

        tx.commit().await?;
        Ok(is_favorite)
    }

    /// Routes favorited by the user, optionally limited to those carrying `category`.
    pub async fn favorite_routes(
        &self,
        user_id: &str,
        category: Option<&str>,
    ) -> Result<Vec<Route>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT r.id, r.user_id, r.route_name, r.route_path,
                   r.category, r.region_id, r.road_type_id, r.transport_id
            FROM favorite_route f
            INNER JOIN route r ON r.id = f.route_id
            WHERE f.user_id = "#,
        );
        query.push_bind(user_id.to_string());

        if let Some(category) = category {
            query.push(" AND ");
            push_any_tag(&mut query, "r.", &[category.to_string()]);
        }
        query.push(" ORDER BY f.id");

        Ok(query.build_query_as::<Route>().fetch_all(&self.pool).await?)
    }
}

/// Append `column IN (?, ?, ...)` binding each tag.
fn push_in_list(query: &mut QueryBuilder<'_, Sqlite>, column: &str, tags: &[String]) {
    query.push(column).push(" IN (");
    let mut list = query.separated(", ");
    for tag in tags {
        list.push_bind(tag.clone());
    }
    list.push_unseparated(")");
}

/// Append a condition true when any tag column holds one of `tags`.
fn push_any_tag(query: &mut QueryBuilder<'_, Sqlite>, prefix: &str, tags: &[String]) {
    query.push("(");
    for (i, column) in ["category", "region_id", "road_type_id", "transport_id"]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            query.push(" OR ");
        }
        push_in_list(query, &format!("{}{}", prefix, column), tags);
    }
    query.push(")");
}
