use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{GameId, GameSnap, ListType};

/// Games in one collection, keyed by id.
pub type Collection = BTreeMap<GameId, GameSnap>;

/// A user review. Reviews are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub game_id: GameId,
    pub rating: i64,
    #[serde(default)]
    pub text: Option<String>,
    /// Milliseconds since the unix epoch.
    pub created_at: i64,
}

/// A user-defined checklist item for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub unlocked: bool,
    /// Set when unlocked, cleared when locked again.
    #[serde(default)]
    pub date_unlocked: Option<i64>,
}

/// The five built-in collections.
///
/// Each collection sits behind its own `Arc` so touching one of them leaves the
/// other four shared with the previous state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lists {
    pub favorites: Arc<Collection>,
    pub wishlist: Arc<Collection>,
    pub playing: Arc<Collection>,
    pub completed: Arc<Collection>,
    pub backlog: Arc<Collection>,
}

impl Lists {
    pub fn get(&self, list: ListType) -> &Collection {
        match list {
            ListType::Favorites => &self.favorites,
            ListType::Wishlist => &self.wishlist,
            ListType::Playing => &self.playing,
            ListType::Completed => &self.completed,
            ListType::Backlog => &self.backlog,
        }
    }

    pub(crate) fn slot_mut(&mut self, list: ListType) -> &mut Arc<Collection> {
        match list {
            ListType::Favorites => &mut self.favorites,
            ListType::Wishlist => &mut self.wishlist,
            ListType::Playing => &mut self.playing,
            ListType::Completed => &mut self.completed,
            ListType::Backlog => &mut self.backlog,
        }
    }
}

/// Everything the user has recorded on this device.
///
/// Values are never mutated in place once published: [`reduce`](super::reduce)
/// clones the root (a handful of `Arc` bumps) and copies only the subtree a
/// transition touches. Missing top-level keys in a persisted blob fall back to
/// their empty defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDataState {
    pub(crate) lists: Arc<Lists>,
    /// Newest first.
    pub(crate) reviews: Arc<BTreeMap<GameId, Vec<Review>>>,
    /// Creation order.
    pub(crate) achievements: Arc<BTreeMap<GameId, Vec<Achievement>>>,
    pub(crate) catalog: Arc<BTreeMap<GameId, GameSnap>>,
    pub(crate) company_index: Arc<BTreeMap<String, Vec<GameId>>>,
}

impl UserDataState {
    pub fn lists(&self) -> &Lists {
        &self.lists
    }

    pub fn collection(&self, list: ListType) -> &Collection {
        self.lists.get(list)
    }

    pub fn reviews(&self) -> &BTreeMap<GameId, Vec<Review>> {
        &self.reviews
    }

    pub fn achievements(&self) -> &BTreeMap<GameId, Vec<Achievement>> {
        &self.achievements
    }

    /// Most recently seen snapshot of every game ever added anywhere.
    pub fn catalog(&self) -> &BTreeMap<GameId, GameSnap> {
        &self.catalog
    }

    pub fn company_index(&self) -> &BTreeMap<String, Vec<GameId>> {
        &self.company_index
    }
}
