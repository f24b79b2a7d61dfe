// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Category tag normalization and filters.
//!
//! Routes carry a legacy single `category` tag plus three independent axes:
//! region, road type and transport mode. Clients send tags as strings,
//! numbers or lists, and the older app sends axis names in Korean.

use serde_json::{Map, Value};

use crate::models::RouteTags;

/// Sentinel values meaning "no category filter".
const ALL_SENTINELS: [&str; 2] = ["all", "전체"];

const REGION_KEYS: [&str; 2] = ["region", "지역"];
const ROAD_TYPE_KEYS: [&str; 3] = ["road-type", "road_type", "길 유형"];
const TRANSPORT_KEYS: [&str; 2] = ["transport", "이동수단"];

/// Filter for random route selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every route qualifies.
    All,
    /// A route qualifies when any of its tags is in the list.
    Tags(Vec<String>),
}

impl CategoryFilter {
    /// Parse the raw `category` query parameter.
    ///
    /// A JSON array becomes its elements and a JSON number becomes a single
    /// tag. JSON `null` means no filter. Anything else, quoted strings
    /// included, is split on commas as raw text.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return CategoryFilter::All;
        };
        if ALL_SENTINELS.contains(&raw) {
            return CategoryFilter::All;
        }

        let tags: Vec<String> = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items.iter().map(list_item_text).collect(),
            Ok(Value::Number(n)) => vec![n.to_string()],
            Ok(Value::Null) => Vec::new(),
            _ => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        };

        if tags.is_empty() {
            CategoryFilter::All
        } else {
            CategoryFilter::Tags(tags)
        }
    }
}

/// Per-axis tag lists for route search. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    pub region: Vec<String>,
    pub road_type: Vec<String>,
    pub transport: Vec<String>,
}

impl CategorySelection {
    /// Read the `categories` object of a search request.
    ///
    /// Returns `None` when the value is not a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            region: axis_tags(map, &REGION_KEYS),
            road_type: axis_tags(map, &ROAD_TYPE_KEYS),
            transport: axis_tags(map, &TRANSPORT_KEYS),
        })
    }
}

/// Build the tags for a new route from the request's `category` field.
///
/// An object fills the three axes; any other value becomes the legacy
/// single category.
pub fn route_tags(category: Option<&Value>) -> RouteTags {
    match category {
        Some(Value::Object(map)) => RouteTags {
            category: None,
            region_id: axis_value(map, &REGION_KEYS).and_then(normalize_tag),
            road_type_id: axis_value(map, &ROAD_TYPE_KEYS).and_then(normalize_tag),
            transport_id: axis_value(map, &TRANSPORT_KEYS).and_then(normalize_tag),
        },
        Some(value) => RouteTags {
            category: normalize_tag(value),
            ..RouteTags::default()
        },
        None => RouteTags::default(),
    }
}

/// Collapse a tag value into one string.
///
/// Lists keep their first usable element; blank strings and null yield `None`.
pub fn normalize_tag(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(normalize_tag),
        other => tag_text(other),
    }
}

/// Text form of a scalar tag.
fn tag_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text form of a filter list item. Every item yields a tag, so a non-empty
/// list always filters; items that are not scalars use their JSON text.
fn list_item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn axis_value<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn axis_tags(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match axis_value(map, keys) {
        Some(Value::Array(items)) => items.iter().map(list_item_text).collect(),
        Some(other) => tag_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}
