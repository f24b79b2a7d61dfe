// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account routes: registration, login, profile changes and existence checks.

use crate::error::{AppError, Result};
use crate::routes::{json_body, non_empty};
use crate::services::{AccountService, Registration};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const LOGIN_FAILED: &str = "Unknown account, or the ID or password is incorrect.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/check-id", get(check_id_query).post(check_id_body))
        .route("/check-nickname", get(check_nickname))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/change", post(change))
}

// ─── Existence Checks ────────────────────────────────────────

#[derive(Deserialize)]
struct CheckIdParams {
    #[serde(rename = "ID", alias = "id")]
    id: Option<String>,
}

#[derive(Deserialize)]
struct CheckNicknameParams {
    nickname: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DuplicateResponse {
    #[serde(rename = "isDuplicate")]
    pub is_duplicate: bool,
}

fn required_id(params: &CheckIdParams) -> Result<&str> {
    non_empty(&params.id).ok_or_else(|| AppError::BadRequest("No ID was provided.".to_string()))
}

/// `GET /check-id?ID=...`
async fn check_id_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckIdParams>,
) -> Result<Json<ExistsResponse>> {
    let user_id = required_id(&params)?;
    let exists = state.db.user_exists(user_id).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// `POST /check-id` with a JSON body.
async fn check_id_body(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CheckIdParams>, JsonRejection>,
) -> Result<Json<DuplicateResponse>> {
    let params = json_body(payload)?;
    let user_id = required_id(&params)?;
    let is_duplicate = state.db.user_exists(user_id).await?;
    Ok(Json(DuplicateResponse { is_duplicate }))
}

async fn check_nickname(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckNicknameParams>,
) -> Result<Json<ExistsResponse>> {
    let nickname = non_empty(&params.nickname)
        .ok_or_else(|| AppError::BadRequest("No nickname was provided.".to_string()))?;
    let exists = state.db.nickname_exists(nickname).await?;
    Ok(Json(ExistsResponse { exists }))
}

// ─── Registration & Profile ──────────────────────────────────

#[derive(Deserialize, Validate)]
struct RegisterRequest {
    #[serde(rename = "ID", alias = "id")]
    #[validate(length(max = 80))]
    id: Option<String>,
    #[serde(rename = "PW", alias = "password")]
    password: Option<String>,
    #[serde(rename = "NAME", alias = "name")]
    #[validate(length(max = 80))]
    name: Option<String>,
    #[serde(rename = "SEX", alias = "gender")]
    #[validate(length(max = 10))]
    gender: Option<String>,
}

#[derive(Deserialize, Validate)]
struct ChangeRequest {
    #[serde(rename = "ID", alias = "id")]
    id: Option<String>,
    #[serde(rename = "PW", alias = "password")]
    password: Option<String>,
    #[serde(rename = "NEW_PW", alias = "newPassword")]
    new_password: Option<String>,
    #[serde(rename = "NAME", alias = "name")]
    #[validate(length(max = 80))]
    name: Option<String>,
    #[serde(rename = "SEX", alias = "gender")]
    #[validate(length(max = 10))]
    gender: Option<String>,
}

/// Result of a registration or profile change.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccountResponse {
    pub message: String,
    pub success: bool,
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>> {
    let req = json_body(payload)?;
    req.validate()?;

    let (Some(id), Some(password), Some(name), Some(gender)) = (
        non_empty(&req.id),
        non_empty(&req.password),
        non_empty(&req.name),
        non_empty(&req.gender),
    ) else {
        return Err(AppError::BadRequest(
            "ID, password, name and gender are all required.".to_string(),
        ));
    };

    let outcome = AccountService::new(&state.db)
        .register(id, password, name, gender)
        .await?;

    let response = match outcome {
        Registration::Created => AccountResponse {
            message: "Account registration complete.".to_string(),
            success: true,
        },
        Registration::DuplicateId => AccountResponse {
            message: "This ID is already in use.".to_string(),
            success: false,
        },
    };
    Ok(Json(response))
}

async fn change(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChangeRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>> {
    let req = json_body(payload)?;
    req.validate()?;

    let (Some(id), Some(password), Some(new_password), Some(name), Some(gender)) = (
        non_empty(&req.id),
        non_empty(&req.password),
        non_empty(&req.new_password),
        non_empty(&req.name),
        non_empty(&req.gender),
    ) else {
        return Err(AppError::BadRequest("All fields are required.".to_string()));
    };

    let changed = AccountService::new(&state.db)
        .change_info(id, password, new_password, name, gender)
        .await?;

    let response = if changed {
        AccountResponse {
            message: "Account information updated.".to_string(),
            success: true,
        }
    } else {
        AccountResponse {
            message: "The account does not exist or the current password is wrong.".to_string(),
            success: false,
        }
    };
    Ok(Json(response))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct LoginRequest {
    #[serde(rename = "ID", alias = "id")]
    id: Option<String>,
    #[serde(rename = "PW", alias = "password")]
    password: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl LoginResponse {
    fn failed() -> Self {
        Self {
            status: "fail".to_string(),
            message: LOGIN_FAILED.to_string(),
            nickname: None,
        }
    }
}

/// Check credentials.
///
/// Unknown ids, wrong passwords and missing fields all produce the same
/// failure body.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let req = json_body(payload)?;

    let (Some(id), Some(password)) = (non_empty(&req.id), non_empty(&req.password)) else {
        return Ok(Json(LoginResponse::failed()));
    };

    match AccountService::new(&state.db).login(id, password).await? {
        Some(user) => {
            tracing::debug!(user_id = id, "Login succeeded");
            let nickname = user.nickname.unwrap_or_default();
            Ok(Json(LoginResponse {
                status: "success".to_string(),
                message: format!("Welcome, {}", nickname),
                nickname: Some(nickname),
            }))
        }
        None => {
            tracing::debug!(user_id = id, "Login failed");
            Ok(Json(LoginResponse::failed()))
        }
    }
}
