//! Derived reads over [`UserDataState`].

use super::{Achievement, Action, Review, UserDataState};
use crate::catalog::{GameId, GameSnap, ListType};

/// Unlocked/total counts for a game's checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AchievementProgress {
    pub unlocked: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty checklist.
    pub percent: u32,
}

impl UserDataState {
    pub fn in_list(&self, list: ListType, game_id: GameId) -> bool {
        self.collection(list).contains_key(&game_id)
    }

    /// Entries of one collection, ordered by game id.
    pub fn list_entries(&self, list: ListType) -> Vec<&GameSnap> {
        self.collection(list).values().collect()
    }

    pub fn list_len(&self, list: ListType) -> usize {
        self.collection(list).len()
    }

    /// Collections that currently contain the game, in display order.
    pub fn memberships(&self, game_id: GameId) -> Vec<ListType> {
        ListType::ALL
            .into_iter()
            .filter(|list| self.in_list(*list, game_id))
            .collect()
    }

    /// The transition a collection toggle button should submit.
    pub fn toggle_membership_action(&self, list: ListType, snap: &GameSnap) -> Action {
        if self.in_list(list, snap.id) {
            Action::RemoveFromList {
                list,
                game_id: snap.id,
            }
        } else {
            Action::AddToList {
                list,
                snap: snap.clone(),
            }
        }
    }

    /// Newest first.
    pub fn reviews_for(&self, game_id: GameId) -> &[Review] {
        self.reviews.get(&game_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mean rating rounded to one decimal place.
    pub fn average_rating(&self, game_id: GameId) -> Option<f64> {
        let reviews = self.reviews_for(game_id);
        if reviews.is_empty() {
            return None;
        }
        // Ratings are stored unchecked; i128 holds any number of i64 values.
        let sum: i128 = reviews.iter().map(|r| i128::from(r.rating)).sum();
        let mean = sum as f64 / reviews.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }

    pub fn achievements_for(&self, game_id: GameId) -> &[Achievement] {
        self.achievements
            .get(&game_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn achievement_progress(&self, game_id: GameId) -> AchievementProgress {
        let list = self.achievements_for(game_id);
        let unlocked = list.iter().filter(|a| a.unlocked).count();
        let total = list.len();
        let percent = if total == 0 {
            0
        } else {
            (unlocked as f64 * 100.0 / total as f64).round() as u32
        };
        AchievementProgress {
            unlocked,
            total,
            percent,
        }
    }

    /// Games indexed under a company name (trimmed before lookup).
    pub fn games_for_company(&self, company: &str) -> &[GameId] {
        self.company_index
            .get(company.trim())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
