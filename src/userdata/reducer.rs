use std::sync::Arc;

use super::{Achievement, Action, Environment, UserDataState};

/// Apply one transition.
///
/// Returns the next state, or `None` when the transition leaves `state`
/// unchanged: removing a game that is not in the collection, toggling an
/// achievement id that does not exist, or indexing a (company, game) pair that
/// is already indexed. `state` itself is never modified; subtrees the
/// transition does not touch are shared with the returned value.
pub fn reduce(
    state: &UserDataState,
    action: &Action,
    env: &dyn Environment,
) -> Option<UserDataState> {
    let mut next = state.clone();

    match action {
        Action::AddToList { list, snap } => {
            let lists = Arc::make_mut(&mut next.lists);
            Arc::make_mut(lists.slot_mut(*list)).insert(snap.id, snap.clone());
            Arc::make_mut(&mut next.catalog).insert(snap.id, snap.clone());
        }

        Action::RemoveFromList { list, game_id } => {
            if !state.collection(*list).contains_key(game_id) {
                return None;
            }
            let lists = Arc::make_mut(&mut next.lists);
            Arc::make_mut(lists.slot_mut(*list)).remove(game_id);
        }

        Action::AddReview { review } => {
            Arc::make_mut(&mut next.reviews)
                .entry(review.game_id)
                .or_default()
                .insert(0, review.clone());
        }

        Action::AddAchievement { game_id, title } => {
            Arc::make_mut(&mut next.achievements)
                .entry(*game_id)
                .or_default()
                .push(Achievement {
                    id: env.next_id(),
                    title: title.clone(),
                    unlocked: false,
                    date_unlocked: None,
                });
        }

        Action::ToggleAchievement { game_id, id } => {
            let known = state
                .achievements
                .get(game_id)
                .is_some_and(|list| list.iter().any(|achievement| &achievement.id == id));
            if !known {
                return None;
            }
            let now = env.now_millis();
            let list = Arc::make_mut(&mut next.achievements).get_mut(game_id)?;
            for achievement in list.iter_mut().filter(|achievement| &achievement.id == id) {
                achievement.unlocked = !achievement.unlocked;
                achievement.date_unlocked = achievement.unlocked.then_some(now);
            }
        }

        Action::CatalogAdd { snap } => {
            Arc::make_mut(&mut next.catalog).insert(snap.id, snap.clone());
        }

        Action::IndexCompany { company, game_id } => {
            let key = company.trim();
            let indexed = state
                .company_index
                .get(key)
                .is_some_and(|ids| ids.contains(game_id));
            if indexed {
                return None;
            }
            Arc::make_mut(&mut next.company_index)
                .entry(key.to_string())
                .or_default()
                .push(*game_id);
        }
    }

    Some(next)
}
