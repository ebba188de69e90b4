//! Catalog - snapshots of games as the user saw them, and the fixed set of collections.
//!
//! A [`GameSnap`] is captured at the moment a game is added to a collection and
//! is never patched afterwards. Both the collection and the global catalog index
//! keep their own copy.
//!
//! The [`mapping`] submodule turns untyped catalog API payloads into snapshots.

pub mod mapping;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a game.
pub type GameId = u64;

/// Denormalized snapshot of a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnap {
    pub id: GameId,
    pub title: String,
    #[serde(rename = "imgURL", default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
}

impl GameSnap {
    pub fn new(id: GameId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            img_url: None,
            genre: None,
            release_year: None,
        }
    }

    /// Set the cover image, normalizing protocol-relative URLs.
    pub fn with_image(mut self, url: impl AsRef<str>) -> Self {
        self.img_url = normalize_cover_url(url.as_ref());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = Some(year);
        self
    }
}

/// One of the five built-in collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Favorites,
    Wishlist,
    Playing,
    Completed,
    Backlog,
}

impl ListType {
    /// All collections, in display order.
    pub const ALL: [ListType; 5] = [
        ListType::Favorites,
        ListType::Wishlist,
        ListType::Playing,
        ListType::Completed,
        ListType::Backlog,
    ];

    /// Storage name, as it appears in the persisted blob.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Favorites => "favorites",
            ListType::Wishlist => "wishlist",
            ListType::Playing => "playing",
            ListType::Completed => "completed",
            ListType::Backlog => "backlog",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListType::Favorites => "Favorites",
            ListType::Wishlist => "Wishlist",
            ListType::Playing => "Playing",
            ListType::Completed => "Completed",
            ListType::Backlog => "Backlog",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a collection name is not one of the five built-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownListType(pub String);

impl fmt::Display for UnknownListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown collection: {}", self.0)
    }
}

impl std::error::Error for UnknownListType {}

impl FromStr for ListType {
    type Err = UnknownListType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ListType::ALL
            .into_iter()
            .find(|list| list.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownListType(s.to_string()))
    }
}

/// Protocol-relative cover URLs (`//images.example/x.jpg`) become `https:` URLs.
/// Blank input yields `None`.
pub fn normalize_cover_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("//") {
        return Some(format!("https:{}", url));
    }
    Some(url.to_string())
}
