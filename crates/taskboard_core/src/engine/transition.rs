//! Lane transition policy.
//!
//! # Invariants
//! - Entering `Lane::Done` from another lane stamps `completed_at`.
//! - Leaving `Lane::Done` clears `completed_at`.
//! - Any other transition leaves `completed_at` untouched.

use crate::model::item::{Item, Lane};

/// Side effect a lane change has on the completion timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    Stamp,
    Clear,
    Keep,
}

/// Classifies one lane change.
pub fn completion_effect(old_lane: Lane, new_lane: Lane) -> CompletionEffect {
    match (old_lane == Lane::Done, new_lane == Lane::Done) {
        (false, true) => CompletionEffect::Stamp,
        (true, false) => CompletionEffect::Clear,
        _ => CompletionEffect::Keep,
    }
}

/// Returns `item` with the completion side effect of `old_lane -> new_lane`
/// applied.
pub fn apply_transition(mut item: Item, old_lane: Lane, new_lane: Lane, now: i64) -> Item {
    match completion_effect(old_lane, new_lane) {
        CompletionEffect::Stamp => item.completed_at = Some(now),
        CompletionEffect::Clear => item.completed_at = None,
        CompletionEffect::Keep => {}
    }
    item
}

#[cfg(test)]
mod tests {
    use super::{apply_transition, completion_effect, CompletionEffect};
    use crate::model::item::{Item, Lane, Priority};
    use uuid::Uuid;

    fn item(lane: Lane, completed_at: Option<i64>) -> Item {
        Item {
            id: Uuid::from_u128(1),
            title: "t".to_string(),
            description: None,
            lane,
            priority: Priority::High,
            assignee: "a".to_string(),
            created_at: 1,
            completed_at,
            order: 0,
        }
    }

    #[test]
    fn entering_done_stamps_now() {
        let next = apply_transition(item(Lane::Doing, None), Lane::Doing, Lane::Done, 500);
        assert_eq!(next.completed_at, Some(500));
    }

    #[test]
    fn leaving_done_clears_stamp() {
        let next = apply_transition(item(Lane::Done, Some(10)), Lane::Done, Lane::Todo, 500);
        assert_eq!(next.completed_at, None);
    }

    #[test]
    fn other_transitions_keep_stamp() {
        assert_eq!(completion_effect(Lane::Todo, Lane::Doing), CompletionEffect::Keep);
        assert_eq!(completion_effect(Lane::Done, Lane::Done), CompletionEffect::Keep);

        let reorder = apply_transition(item(Lane::Done, Some(10)), Lane::Done, Lane::Done, 500);
        assert_eq!(reorder.completed_at, Some(10));
    }
}
