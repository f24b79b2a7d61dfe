// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite via sqlx).

pub mod sqlite;

pub use sqlite::Db;

/// Schema statements, applied in order by [`Db::migrate`].
///
/// `favorite_route` is unique per (user, route) so concurrent toggles cannot
/// create duplicates, and `user.user_id` is unique so concurrent
/// registrations cannot both succeed.
pub const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS user (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id VARCHAR(80) NOT NULL UNIQUE,
        password VARCHAR(120) NOT NULL,
        nickname VARCHAR(80),
        gender VARCHAR(10)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS route (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id VARCHAR(80) NOT NULL,
        route_name VARCHAR(120) NOT NULL,
        route_path TEXT,
        category VARCHAR(10),
        region_id VARCHAR(10),
        road_type_id VARCHAR(10),
        transport_id VARCHAR(10)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_route_user_id ON route (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS favorite_route (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id VARCHAR(80) NOT NULL,
        route_id INTEGER NOT NULL REFERENCES route (id) ON DELETE CASCADE,
        UNIQUE (user_id, route_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_favorite_route_user_id ON favorite_route (user_id)",
];
