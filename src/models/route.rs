// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved walking route model and its API representation.

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::services::path_codec;

/// Stored route row.
#[derive(Debug, Clone, FromRow)]
pub struct Route {
    pub id: i64,
    /// Owner's external identifier (soft reference to `user.user_id`)
    pub user_id: String,
    pub route_name: String,
    /// Encoded JSON list of points
    pub route_path: Option<String>,
    /// Legacy single category tag
    pub category: Option<String>,
    pub region_id: Option<String>,
    pub road_type_id: Option<String>,
    pub transport_id: Option<String>,
}

/// Category tags attached to a route when it is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTags {
    pub category: Option<String>,
    pub region_id: Option<String>,
    pub road_type_id: Option<String>,
    pub transport_id: Option<String>,
}

/// Fields needed to insert a route.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub user_id: String,
    pub route_name: String,
    /// Already encoded path text
    pub route_path: String,
    pub tags: RouteTags,
}

/// Route as returned by the API.
///
/// `route_path` and `polyline` always carry the same decoded content; older
/// clients read one key and newer clients the other.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteRecord {
    pub id: i64,
    pub user_id: String,
    pub route_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub route_path: Value,
    #[cfg_attr(feature = "binding-generation", ts(type = "unknown"))]
    pub polyline: Value,
    pub category: Option<String>,
    pub region_id: Option<String>,
    pub road_type_id: Option<String>,
    pub transport_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl Route {
    /// Decoded path, falling back to an empty list for unreadable text.
    pub fn decoded_path(&self) -> Value {
        path_codec::decode_stored(self.route_path.as_deref())
    }

    /// Convert into the API representation.
    pub fn into_record(self) -> RouteRecord {
        let path = self.decoded_path();
        RouteRecord {
            id: self.id,
            user_id: self.user_id,
            route_name: self.route_name,
            nickname: None,
            polyline: path.clone(),
            route_path: path,
            category: self.category,
            region_id: self.region_id,
            road_type_id: self.road_type_id,
            transport_id: self.transport_id,
            is_favorite: None,
        }
    }
}

impl RouteRecord {
    pub fn with_nickname(mut self, nickname: String) -> Self {
        self.nickname = Some(nickname);
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }
}
