//! Queue-state traversal for the pickup pass (§4.7 step 2.6): the same
//! priority ordering [`foreman_core::Workflow::queue_labels`] computes, but
//! keeping the state key and the full [`State`] around so the pickup pass
//! can read `on[PICKUP]`'s target directly instead of re-deriving it from
//! the label alone.

use foreman_core::workflow::{State, StateKey, StateType};
use foreman_core::Workflow;

/// Queue states declaring `role`, ordered by descending `priority` (ties
/// keep declaration order) — mirrors `Workflow::queue_labels` exactly.
pub fn queue_states_for_role<'a>(workflow: &'a Workflow, role: &str) -> Vec<(&'a StateKey, &'a State)> {
    let mut matches: Vec<(i32, usize, &StateKey, &State)> = workflow
        .states
        .iter()
        .enumerate()
        .filter(|(_, (_, s))| s.state_type == StateType::Queue && s.role.as_deref() == Some(role))
        .map(|(idx, (key, s))| (s.priority.unwrap_or(0), idx, key, s))
        .collect();
    matches.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    matches.into_iter().map(|(_, _, key, s)| (key, s)).collect()
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
