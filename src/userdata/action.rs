use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Review;
use crate::catalog::{GameId, GameSnap, ListType};

/// A state transition request.
///
/// Serialized with a `type` tag (`ADD_TO_LIST`, `REMOVE_FROM_LIST`, ...) and
/// camelCase fields, so requests can also arrive as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Insert or overwrite `snap` in `list`, and in the catalog index.
    AddToList { list: ListType, snap: GameSnap },
    /// Drop a game from one collection. The catalog index keeps it.
    RemoveFromList { list: ListType, game_id: GameId },
    /// Prepend a review. The rating is not re-checked here.
    AddReview { review: Review },
    /// Append a locked achievement with a freshly generated id.
    AddAchievement { game_id: GameId, title: String },
    ToggleAchievement { game_id: GameId, id: String },
    CatalogAdd { snap: GameSnap },
    /// Add `game_id` to the set indexed under the trimmed company name.
    IndexCompany { company: String, game_id: GameId },
}

impl Action {
    /// Parse a JSON transition request.
    ///
    /// Unknown tags and malformed payloads yield `None`.
    pub fn from_value(value: &Value) -> Option<Action> {
        match Action::deserialize(value) {
            Ok(action) => Some(action),
            Err(err) => {
                log::debug!(
                    "ignoring transition request {:?}: {}",
                    value.get("type").and_then(Value::as_str).unwrap_or("<untagged>"),
                    err
                );
                None
            }
        }
    }

    /// The wire tag of this transition.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddToList { .. } => "ADD_TO_LIST",
            Action::RemoveFromList { .. } => "REMOVE_FROM_LIST",
            Action::AddReview { .. } => "ADD_REVIEW",
            Action::AddAchievement { .. } => "ADD_ACHIEVEMENT",
            Action::ToggleAchievement { .. } => "TOGGLE_ACHIEVEMENT",
            Action::CatalogAdd { .. } => "CATALOG_ADD",
            Action::IndexCompany { .. } => "INDEX_COMPANY",
        }
    }

    /// The game this transition is about.
    pub fn game_id(&self) -> GameId {
        match self {
            Action::AddToList { snap, .. } | Action::CatalogAdd { snap } => snap.id,
            Action::AddReview { review } => review.game_id,
            Action::RemoveFromList { game_id, .. }
            | Action::AddAchievement { game_id, .. }
            | Action::ToggleAchievement { game_id, .. }
            | Action::IndexCompany { game_id, .. } => *game_id,
        }
    }
}
