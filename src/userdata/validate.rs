//! Checks that belong to callers, not to [`reduce`](super::reduce).
//!
//! The store trusts what it is given: a review with rating 11 is stored as-is
//! and an empty achievement title becomes an achievement with an empty title.
//! Input surfaces run their submissions through these helpers first.

use std::fmt;
use std::ops::RangeInclusive;

use super::{Action, Review};
use crate::catalog::GameId;

pub const RATING_RANGE: RangeInclusive<i64> = 1..=10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    RatingOutOfRange(i64),
    EmptyTitle,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::RatingOutOfRange(rating) => write!(
                f,
                "rating {} is outside {}..={}",
                rating,
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
            ValidationError::EmptyTitle => write!(f, "achievement title is empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A review as typed into a form, before it gets a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub game_id: GameId,
    pub rating: i64,
    pub text: String,
}

impl ReviewDraft {
    pub fn new(game_id: GameId, rating: i64, text: impl Into<String>) -> Self {
        Self {
            game_id,
            rating,
            text: text.into(),
        }
    }

    /// Check the rating and stamp the review. Blank text is dropped.
    pub fn into_review(self, created_at: i64) -> Result<Review, ValidationError> {
        if !RATING_RANGE.contains(&self.rating) {
            return Err(ValidationError::RatingOutOfRange(self.rating));
        }
        let text = self.text.trim();
        Ok(Review {
            game_id: self.game_id,
            rating: self.rating,
            text: (!text.is_empty()).then(|| text.to_string()),
            created_at,
        })
    }
}

/// Trimmed achievement title, or `EmptyTitle`.
pub fn achievement_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(title.to_string())
}

impl Action {
    /// `AddReview` from a draft, rejecting out-of-range ratings.
    pub fn add_review_checked(draft: ReviewDraft, created_at: i64) -> Result<Action, ValidationError> {
        Ok(Action::AddReview {
            review: draft.into_review(created_at)?,
        })
    }

    /// `AddAchievement` with a trimmed, non-empty title.
    pub fn add_achievement_checked(game_id: GameId, title: &str) -> Result<Action, ValidationError> {
        Ok(Action::AddAchievement {
            game_id,
            title: achievement_title(title)?,
        })
    }
}
