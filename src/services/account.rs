// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, login and profile changes.

use sha2::{Digest, Sha256};

use crate::db::Db;
use crate::error::Result;
use crate::models::{NewUser, User};

/// One-way password digest: lowercase hex SHA-256, unsalted.
///
/// Stored digests must keep this exact format for existing accounts to log in.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    DuplicateId,
}

/// Account operations over the user table.
pub struct AccountService<'a> {
    db: &'a Db,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Create an account unless the identifier is taken.
    pub async fn register(
        &self,
        user_id: &str,
        password: &str,
        nickname: &str,
        gender: &str,
    ) -> Result<Registration> {
        let created = self
            .db
            .insert_user(&NewUser {
                user_id: user_id.to_string(),
                password_digest: hash_password(password),
                nickname: nickname.to_string(),
                gender: gender.to_string(),
            })
            .await?;

        if created {
            tracing::info!(user_id, "Account registered");
            Ok(Registration::Created)
        } else {
            tracing::info!(user_id, "Registration rejected: id already in use");
            Ok(Registration::DuplicateId)
        }
    }

    /// Check credentials. `None` covers both unknown id and wrong password.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<Option<User>> {
        let user = self.db.get_user(user_id).await?;
        Ok(user.filter(|u| u.password == hash_password(password)))
    }

    /// Replace password, nickname and gender after verifying the current password.
    ///
    /// Returns `false` when the account is unknown or the password is wrong.
    pub async fn change_info(
        &self,
        user_id: &str,
        password: &str,
        new_password: &str,
        nickname: &str,
        gender: &str,
    ) -> Result<bool> {
        if self.login(user_id, password).await?.is_none() {
            return Ok(false);
        }

        let updated = self
            .db
            .update_user(&NewUser {
                user_id: user_id.to_string(),
                password_digest: hash_password(new_password),
                nickname: nickname.to_string(),
                gender: gender.to_string(),
            })
            .await?;

        if updated {
            tracing::info!(user_id, "Account information changed");
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("p"),
            "148de9c5a7a44d19e56cd9ae1a554bf67847afb0c58f6e12fa29ac7ddfca9940"
        );
        assert_eq!(hash_password("p").len(), 64);
        assert_ne!(hash_password("p"), hash_password("q"));
    }

    #[tokio::test]
    async fn test_register_login_and_change() {
        let db = Db::in_memory().await.unwrap();
        let accounts = AccountService::new(&db);

        assert_eq!(
            accounts.register("u1", "p", "Walker", "F").await.unwrap(),
            Registration::Created
        );
        assert_eq!(
            accounts.register("u1", "other", "Someone", "M").await.unwrap(),
            Registration::DuplicateId
        );

        let user = accounts.login("u1", "p").await.unwrap().unwrap();
        assert_eq!(user.nickname.as_deref(), Some("Walker"));
        assert!(accounts.login("u1", "wrong").await.unwrap().is_none());
        assert!(accounts.login("unknown", "p").await.unwrap().is_none());

        assert!(!accounts
            .change_info("u1", "wrong", "p2", "Runner", "M")
            .await
            .unwrap());
        assert!(accounts
            .change_info("u1", "p", "p2", "Runner", "M")
            .await
            .unwrap());
        assert!(accounts.login("u1", "p").await.unwrap().is_none());
        let user = accounts.login("u1", "p2").await.unwrap().unwrap();
        assert_eq!(user.nickname.as_deref(), Some("Runner"));
        assert_eq!(user.gender.as_deref(), Some("M"));
    }
}
