//! Boundary mapping from the catalog API's untyped JSON to [`GameSnap`].
//!
//! The API is not stable about field names: summaries carry `title`/`imgURL`/`genre`,
//! detail lookups carry `name`/`cover.url`/`genres`, and detail responses may
//! arrive wrapped in `data`, `result` or `game`, inside an array, or even as a
//! JSON string. Everything downstream of this module only sees typed snapshots.

use chrono::{DateTime, Datelike};
use serde_json::Value;
use std::fmt;

use super::{normalize_cover_url, GameId, GameSnap};
use crate::userdata::Action;

const UNKNOWN_TITLE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// The payload (after unwrapping) is not a JSON object.
    NotAnObject,
    /// No usable numeric `id` field.
    MissingId,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::NotAnObject => write!(f, "catalog payload is not an object"),
            MappingError::MissingId => write!(f, "catalog payload has no numeric id"),
        }
    }
}

impl std::error::Error for MappingError {}

/// A company credited on a game detail payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvolvedCompany {
    pub name: String,
    pub developer: bool,
    pub publisher: bool,
}

/// Peel the wrappers a detail lookup may come back in.
///
/// Returns `None` when no object is left once the wrappers are gone.
pub fn unwrap_detail_payload(value: &Value) -> Option<Value> {
    let mut raw = match value {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    };

    let inner = ["data", "result", "game"]
        .into_iter()
        .find_map(|wrapper| raw.get(wrapper).filter(|v| !v.is_null()).cloned());
    if let Some(inner) = inner {
        raw = inner;
    }

    if let Value::Array(items) = raw {
        raw = items.into_iter().next()?;
    }

    raw.is_object().then_some(raw)
}

/// Which field names win when a payload carries both spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Listing/search items: `title`, `imgURL`, `genre`, `releaseYear`.
    Summary,
    /// Detail lookups: `name`, `cover.url`, `genres`, `first_release_date`.
    Detail,
}

impl Shape {
    fn ordered<'a>(self, summary: &'a str, detail: &'a str) -> [&'a str; 2] {
        match self {
            Shape::Summary => [summary, detail],
            Shape::Detail => [detail, summary],
        }
    }
}

/// Map a list/search summary to a snapshot, falling back to detail field
/// names when the summary ones are missing.
pub fn snap_from_summary(value: &Value) -> Result<GameSnap, MappingError> {
    map_snap(value, Shape::Summary)
}

fn map_snap(value: &Value, shape: Shape) -> Result<GameSnap, MappingError> {
    if !value.is_object() {
        return Err(MappingError::NotAnObject);
    }
    let id = game_id(value.get("id")).ok_or(MappingError::MissingId)?;
    let text = |summary: &str, detail: &str| {
        shape
            .ordered(summary, detail)
            .into_iter()
            .find_map(|pointer| non_empty_str(value.pointer(pointer)))
    };

    let title = text("/title", "/name").unwrap_or(UNKNOWN_TITLE).to_string();
    let img_url = text("/imgURL", "/cover/url").and_then(normalize_cover_url);
    let genre = text("/genre", "/genres/0/name").map(str::to_string);

    let summary_year = || {
        value
            .get("releaseYear")
            .and_then(Value::as_i64)
            .and_then(|y| i32::try_from(y).ok())
    };
    let detail_year = || {
        value
            .get("first_release_date")
            .and_then(Value::as_i64)
            .and_then(release_year_from_unix)
    };
    let release_year = match shape {
        Shape::Summary => summary_year().or_else(detail_year),
        Shape::Detail => detail_year().or_else(summary_year),
    };

    Ok(GameSnap {
        id,
        title,
        img_url,
        genre,
        release_year,
    })
}

/// Map every summary in a listing, skipping entries that cannot be mapped.
pub fn snaps_from_listing(value: &Value) -> Vec<GameSnap> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match snap_from_summary(item) {
            Ok(snap) => Some(snap),
            Err(err) => {
                log::debug!("skipping catalog listing entry: {}", err);
                None
            }
        })
        .collect()
}

/// Map a detail lookup response to a snapshot.
pub fn snap_from_detail(value: &Value) -> Result<GameSnap, MappingError> {
    let item = unwrap_detail_payload(value).ok_or(MappingError::NotAnObject)?;
    map_snap(&item, Shape::Detail)
}

/// Companies credited on a detail payload, in payload order.
pub fn involved_companies(value: &Value) -> Vec<InvolvedCompany> {
    let Some(item) = unwrap_detail_payload(value) else {
        return Vec::new();
    };
    let Some(entries) = item.get("involved_companies").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let name = non_empty_str(entry.pointer("/company/name"))?;
            Some(InvolvedCompany {
                name: name.to_string(),
                developer: entry.get("developer").and_then(Value::as_bool).unwrap_or(false),
                publisher: entry.get("publisher").and_then(Value::as_bool).unwrap_or(false),
            })
        })
        .collect()
}

/// One `IndexCompany` transition per company credited on a detail payload.
pub fn company_index_actions(value: &Value) -> Result<Vec<Action>, MappingError> {
    let snap = snap_from_detail(value)?;
    Ok(involved_companies(value)
        .into_iter()
        .map(|company| Action::IndexCompany {
            company: company.name,
            game_id: snap.id,
        })
        .collect())
}

/// UTC calendar year of a unix timestamp in seconds.
pub fn release_year_from_unix(secs: i64) -> Option<i32> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0).map(|dt| dt.year())
}

fn game_id(value: Option<&Value>) -> Option<GameId> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
