// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walkcanvas: share and discover walking routes
//!
//! This crate provides the backend API for registering accounts, saving GPS
//! routes, bookmarking favorites and searching routes by region, road type
//! and transport mode.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
}
