// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod favorite;
pub mod route;
pub mod user;

pub use favorite::FavoriteRoute;
pub use route::{NewRoute, Route, RouteRecord, RouteTags};
pub use user::{NewUser, User};
