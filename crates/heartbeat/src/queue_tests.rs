use foreman_core::default_workflow;

use super::queue_states_for_role;

#[test]
fn orders_developer_queue_states_by_descending_priority() {
    let workflow = default_workflow();
    let ordered = queue_states_for_role(&workflow, "developer");
    let labels: Vec<&str> = ordered.iter().map(|(_, s)| s.label.as_str()).collect();
    // toImprove (priority 3) outranks todo (priority 1).
    assert_eq!(labels, vec!["To Improve", "To Do"]);
}

#[test]
fn unknown_role_yields_no_queue_states() {
    let workflow = default_workflow();
    assert!(queue_states_for_role(&workflow, "nonexistent").is_empty());
}

#[test]
fn reviewer_queue_state_carries_its_pickup_transition() {
    let workflow = default_workflow();
    let ordered = queue_states_for_role(&workflow, "reviewer");
    assert_eq!(ordered.len(), 1);
    let (_, state) = ordered[0];
    assert_eq!(state.on.get("PICKUP").map(|t| t.target.as_str()), Some("reviewing"));
}
