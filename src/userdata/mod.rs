//! User data - collections, reviews, achievements and the indices derived from them.
//!
//! All changes go through [`reduce`], a pure transition function over
//! [`UserDataState`]. The store in [`crate::store`] owns the canonical value and
//! decides when to persist it.
//!
//! ## Example
//!
//! ```
//! use arcade_atlas::{reduce, Action, FixedEnvironment, GameSnap, ListType, UserDataState};
//!
//! let env = FixedEnvironment::new(0);
//! let state = UserDataState::default();
//! let next = reduce(
//!     &state,
//!     &Action::AddToList { list: ListType::Favorites, snap: GameSnap::new(42, "Hollow Knight") },
//!     &env,
//! )
//! .unwrap();
//!
//! assert!(next.in_list(ListType::Favorites, 42));
//! assert!(!state.in_list(ListType::Favorites, 42));
//! ```

mod action;
mod env;
mod reducer;
mod selectors;
mod state;
mod validate;

pub use action::Action;
pub use env::{Environment, FixedEnvironment, SystemEnvironment};
pub use reducer::reduce;
pub use selectors::AchievementProgress;
pub use state::{Achievement, Collection, Lists, Review, UserDataState};
pub use validate::{achievement_title, ReviewDraft, ValidationError, RATING_RANGE};
