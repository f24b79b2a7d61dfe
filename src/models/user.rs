// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account model.

use sqlx::FromRow;

/// Registered account as stored in the `user` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Surrogate row id
    pub id: i64,
    /// External login identifier (unique)
    pub user_id: String,
    /// SHA-256 hex digest of the password
    pub password: String,
    /// Display name
    pub nickname: Option<String>,
    /// Free-form gender tag
    pub gender: Option<String>,
}

/// Fields needed to create or overwrite an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub password_digest: String,
    pub nickname: String,
    pub gender: String,
}
