//! The workflow state machine: a declarative, data-driven description of
//! states, roles, transitions, routing policies, and side-effect actions.
//!
//! A [`Workflow`] is plain data — no trait objects, no behavior attached to
//! states. Every operation here is a pure function over a `&Workflow` value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

pub type StateKey = SmolStr;
pub type Label = SmolStr;
pub type EventName = SmolStr;
pub type RoleId = SmolStr;
pub type ActionName = SmolStr;

/// Well-known event names fired by the engine itself. Workflows may also
/// reference user-defined event names; those are opaque to the core.
pub mod events {
    pub const PICKUP: &str = "PICKUP";
    pub const COMPLETE: &str = "COMPLETE";
    pub const REVIEW: &str = "REVIEW";
    pub const APPROVED: &str = "APPROVED";
    pub const CHANGES_REQUESTED: &str = "CHANGES_REQUESTED";
    pub const MERGE_CONFLICT: &str = "MERGE_CONFLICT";
    pub const MERGE_FAILED: &str = "MERGE_FAILED";
    pub const PASS: &str = "PASS";
    pub const FAIL: &str = "FAIL";
    pub const REFINE: &str = "REFINE";
    pub const BLOCKED: &str = "BLOCKED";
    pub const APPROVE: &str = "APPROVE";
    pub const REJECT: &str = "REJECT";
}

/// Well-known built-in side-effect action names. A workflow may also list
/// user-defined action strings; the dispatcher treats unknown names as no-ops.
pub mod actions {
    pub const GIT_PULL: &str = "gitPull";
    pub const DETECT_PR: &str = "detectPr";
    pub const MERGE_PR: &str = "mergePr";
    pub const CLOSE_ISSUE: &str = "closeIssue";
    pub const REOPEN_ISSUE: &str = "reopenIssue";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateType {
    Queue,
    Active,
    Hold,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewCheck {
    PrApproved,
    PrMerged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPolicy {
    Human,
    Agent,
    Auto,
}

/// `review:human` | `review:agent`, the value applied as a routing label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewRouting {
    Human,
    Agent,
}

crate::simple_display! {
    ReviewRouting {
        Human => "review:human",
        Agent => "review:agent",
    }
}

/// A transition: either a bare target state key, or a record naming a target
/// plus an ordered list of side-effect actions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub target: StateKey,
    pub actions: Vec<ActionName>,
}

impl Transition {
    pub fn to(target: impl Into<StateKey>) -> Self {
        Self { target: target.into(), actions: Vec::new() }
    }

    pub fn with_actions<I, S>(target: impl Into<StateKey>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ActionName>,
    {
        Self { target: target.into(), actions: actions.into_iter().map(Into::into).collect() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTransition {
    Bare(StateKey),
    Record {
        target: StateKey,
        #[serde(default)]
        actions: Vec<ActionName>,
    },
}

impl<'de> Deserialize<'de> for Transition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawTransition::deserialize(deserializer)? {
            RawTransition::Bare(target) => Transition { target, actions: Vec::new() },
            RawTransition::Record { target, actions } => Transition { target, actions },
        })
    }
}

impl Serialize for Transition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.actions.is_empty() {
            serializer.serialize_str(&self.target)
        } else {
            use serde::ser::SerializeStruct;
            let mut s = serializer.serialize_struct("Transition", 2)?;
            s.serialize_field("target", &self.target)?;
            s.serialize_field("actions", &self.actions)?;
            s.end()
        }
    }
}

/// One state in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "type")]
    pub state_type: StateType,
    pub label: Label,
    pub color: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<ReviewCheck>,
    #[serde(default)]
    pub on: IndexMap<EventName, Transition>,
}

/// Governs the `test:*` routing label, resolved the same way as review
/// routing but with a fourth value that opts a workflow out of test routing
/// entirely. Not named in the distilled data model's `Workflow` fields
/// (§3.1 lists only `reviewPolicy`); `policy=skip ⇒ "test:skip"` in §4.1
/// implies a sibling policy knob, so it travels alongside `review_policy`
/// here rather than as a second top-level config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestPolicy {
    Skip,
    Human,
    Agent,
    Auto,
}

impl Default for TestPolicy {
    fn default() -> Self {
        TestPolicy::Skip
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestRouting {
    Skip,
    Human,
    Agent,
}

crate::simple_display! {
    TestRouting {
        Skip => "test:skip",
        Human => "test:human",
        Agent => "test:agent",
    }
}

/// A static graph of states, transitions, and the review routing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub initial: StateKey,
    pub review_policy: ReviewPolicy,
    #[serde(default)]
    pub test_policy: TestPolicy,
    pub states: IndexMap<StateKey, State>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("initial state {0:?} is not defined")]
    UndefinedInitial(StateKey),
    #[error("state {state:?} has a transition on {event:?} targeting undefined state {target:?}")]
    UndefinedTransitionTarget { state: StateKey, event: EventName, target: StateKey },
    #[error("state {0:?} is queue/active but carries no role")]
    MissingRole(StateKey),
    #[error("label {label:?} is used by both {first:?} and {second:?}")]
    DuplicateLabel { label: Label, first: StateKey, second: StateKey },
    #[error("role {0:?} has no active state")]
    NoActiveState(RoleId),
    #[error("role {role:?} has more than one active state ({first:?} and {second:?})")]
    MultipleActiveStates { role: RoleId, first: StateKey, second: StateKey },
}

impl Workflow {
    /// Validate every invariant from the data model once, at config-load
    /// time, so the pure functions below can assume a well-formed graph.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !self.states.contains_key(&self.initial) {
            return Err(WorkflowError::UndefinedInitial(self.initial.clone()));
        }

        let mut seen_labels: IndexMap<Label, StateKey> = IndexMap::new();
        for (key, state) in &self.states {
            if matches!(state.state_type, StateType::Queue | StateType::Active) && state.role.is_none()
            {
                return Err(WorkflowError::MissingRole(key.clone()));
            }
            if let Some(first) = seen_labels.insert(state.label.clone(), key.clone()) {
                return Err(WorkflowError::DuplicateLabel {
                    label: state.label.clone(),
                    first,
                    second: key.clone(),
                });
            }
            for (event, transition) in &state.on {
                if !self.states.contains_key(&transition.target) {
                    return Err(WorkflowError::UndefinedTransitionTarget {
                        state: key.clone(),
                        event: event.clone(),
                        target: transition.target.clone(),
                    });
                }
            }
        }

        // Exactly one active state per role referenced by an active state.
        let mut active_by_role: IndexMap<RoleId, StateKey> = IndexMap::new();
        for (key, state) in &self.states {
            if state.state_type != StateType::Active {
                continue;
            }
            // Every Queue/Active state was already checked to carry a role above.
            #[allow(clippy::expect_used)]
            let role = state.role.clone().expect("checked above");
            if let Some(first) = active_by_role.insert(role.clone(), key.clone()) {
                return Err(WorkflowError::MultipleActiveStates { role, first, second: key.clone() });
            }
        }

        Ok(())
    }

    /// All label strings declared by any state, in declaration order.
    pub fn state_labels(&self) -> Vec<Label> {
        self.states.values().map(|s| s.label.clone()).collect()
    }

    /// Queue-state labels for a role, ordered by descending priority (ties
    /// keep declaration order; priority defaults to 0 when absent).
    pub fn queue_labels(&self, role: &str) -> Vec<Label> {
        let mut matches: Vec<(i32, usize, &State)> = self
            .states
            .values()
            .enumerate()
            .filter(|(_, s)| s.state_type == StateType::Queue && s.role.as_deref() == Some(role))
            .map(|(idx, s)| (s.priority.unwrap_or(0), idx, s))
            .collect();
        matches.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        matches.into_iter().map(|(_, _, s)| s.label.clone()).collect()
    }

    /// The single active-state label for a role. Fails if zero or more than
    /// one active state declares this role (validated up-front by
    /// [`Workflow::validate`]; this is a defensive re-check for callers that
    /// construct a `Workflow` without going through it).
    pub fn active_label(&self, role: &str) -> Result<Label, WorkflowError> {
        let mut found: Option<&State> = None;
        for state in self.states.values() {
            if state.state_type == StateType::Active && state.role.as_deref() == Some(role) {
                if let Some(first) = found {
                    return Err(WorkflowError::MultipleActiveStates {
                        role: role.into(),
                        first: first.label.clone().into(),
                        second: state.label.clone().into(),
                    });
                }
                found = Some(state);
            }
        }
        found.map(|s| s.label.clone()).ok_or_else(|| WorkflowError::NoActiveState(role.into()))
    }

    /// The queue label whose PICKUP transition targets the active state for
    /// `role`. Used as the default revert target on health-checker repairs.
    pub fn revert_label(&self, role: &str) -> Option<Label> {
        let active_key = self
            .states
            .iter()
            .find(|(_, s)| s.state_type == StateType::Active && s.role.as_deref() == Some(role))
            .map(|(k, _)| k.clone())?;

        self.states
            .values()
            .find(|s| {
                s.state_type == StateType::Queue
                    && s.role.as_deref() == Some(role)
                    && s.on.get(events::PICKUP).map(|t| &t.target) == Some(&active_key)
            })
            .map(|s| s.label.clone())
    }

    /// The unique label among `issue_labels` that is also a workflow label.
    /// If more than one is present the workflow is considered violated; the
    /// first one by state-declaration order is returned.
    pub fn current_state_label(&self, issue_labels: &[impl AsRef<str>]) -> Option<Label> {
        self.states.values().find_map(|s| {
            issue_labels.iter().any(|l| l.as_ref() == s.label.as_str()).then(|| s.label.clone())
        })
    }

    /// Resolve a worker `result` into the transition it fires: `"done"` maps
    /// to the COMPLETE event; any other result is upper-cased into an event
    /// name directly (`"blocked"` → `BLOCKED`).
    pub fn completion_rule(&self, role: &str, result: &str) -> Option<CompletionRule> {
        let event: EventName = if result.eq_ignore_ascii_case("done") {
            events::COMPLETE.into()
        } else {
            result.to_ascii_uppercase().into()
        };

        let (from_key, from_state) = self
            .states
            .iter()
            .find(|(_, s)| s.state_type == StateType::Active && s.role.as_deref() == Some(role))?;
        let transition = from_state.on.get(&event)?;
        let to_label = self.states.get(&transition.target)?.label.clone();

        Some(CompletionRule {
            from: from_state.label.clone(),
            _from_key: from_key.clone(),
            to: to_label,
            actions: transition.actions.clone(),
        })
    }

    /// True iff some transition whose event is one of the feedback events
    /// targets the state labelled `label`.
    pub fn is_feedback_state(&self, label: &str) -> bool {
        const FEEDBACK_EVENTS: &[&str] = &[
            events::CHANGES_REQUESTED,
            events::MERGE_CONFLICT,
            events::MERGE_FAILED,
            events::REJECT,
            events::FAIL,
        ];
        let Some(target_key) = self.states.iter().find(|(_, s)| s.label == label).map(|(k, _)| k)
        else {
            return false;
        };
        self.states.values().any(|s| {
            s.on.iter().any(|(event, t)| {
                FEEDBACK_EVENTS.contains(&event.as_str()) && &t.target == target_key
            })
        })
    }

    /// True iff any state for `role` declares a `check`.
    pub fn has_review_check(&self, role: &str) -> bool {
        self.states.values().any(|s| s.role.as_deref() == Some(role) && s.check.is_some())
    }

    /// True iff the role's active state has any transition targeting a
    /// state with `check` set.
    pub fn produces_reviewable_work(&self, role: &str) -> bool {
        let Some(active) = self
            .states
            .values()
            .find(|s| s.state_type == StateType::Active && s.role.as_deref() == Some(role))
        else {
            return false;
        };
        active.on.values().any(|t| self.states.get(&t.target).is_some_and(|s| s.check.is_some()))
    }

    /// True iff any state declares a PASS or FAIL transition — the
    /// structural signature of a tester-style gate state (`testing` in the
    /// default workflow). A workflow with no such state has no test phase
    /// and dispatch never applies a `test:*` routing label.
    pub fn has_test_phase(&self) -> bool {
        self.states.values().any(|s| s.on.contains_key(events::PASS) || s.on.contains_key(events::FAIL))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRule {
    pub from: Label,
    pub to: Label,
    pub actions: Vec<ActionName>,
    _from_key: StateKey,
}

/// `resolveReviewRouting(policy, level)`.
pub fn resolve_review_routing(policy: ReviewPolicy, level: &str) -> ReviewRouting {
    match policy {
        ReviewPolicy::Human => ReviewRouting::Human,
        ReviewPolicy::Agent => ReviewRouting::Agent,
        ReviewPolicy::Auto => {
            if level == "senior" {
                ReviewRouting::Human
            } else {
                ReviewRouting::Agent
            }
        }
    }
}

/// `resolveTestRouting(policy, level)`, mirroring `resolve_review_routing`
/// with an additional `skip` policy value.
pub fn resolve_test_routing(policy: TestPolicy, level: &str) -> TestRouting {
    match policy {
        TestPolicy::Skip => TestRouting::Skip,
        TestPolicy::Human => TestRouting::Human,
        TestPolicy::Agent => TestRouting::Agent,
        TestPolicy::Auto => {
            if level == "senior" {
                TestRouting::Human
            } else {
                TestRouting::Agent
            }
        }
    }
}

/// Build the bit-exact default workflow (spec §6.4) as a data literal, with
/// no parsing and no I/O — usable as the fallback when no workflow override
/// file exists on disk.
pub fn default_workflow() -> Workflow {
    let mut states = IndexMap::new();

    states.insert(
        "planning".into(),
        State {
            state_type: StateType::Hold,
            label: "Planning".into(),
            color: "#cccccc".into(),
            role: None,
            priority: None,
            check: None,
            on: [(events::APPROVE.into(), Transition::to("todo"))].into_iter().collect(),
        },
    );
    states.insert(
        "todo".into(),
        State {
            state_type: StateType::Queue,
            label: "To Do".into(),
            color: "#c2e0c6".into(),
            role: Some("developer".into()),
            priority: Some(1),
            check: None,
            on: [(events::PICKUP.into(), Transition::to("doing"))].into_iter().collect(),
        },
    );
    states.insert(
        "doing".into(),
        State {
            state_type: StateType::Active,
            label: "Doing".into(),
            color: "#fef2c0".into(),
            role: Some("developer".into()),
            priority: None,
            check: None,
            on: [
                (events::COMPLETE.into(), Transition::with_actions("toReview", [actions::DETECT_PR])),
                (events::BLOCKED.into(), Transition::to("refining")),
            ]
            .into_iter()
            .collect(),
        },
    );
    states.insert(
        "toReview".into(),
        State {
            state_type: StateType::Queue,
            label: "To Review".into(),
            color: "#d4c5f9".into(),
            role: Some("reviewer".into()),
            priority: Some(2),
            check: Some(ReviewCheck::PrApproved),
            on: [
                (events::PICKUP.into(), Transition::to("reviewing")),
                (
                    events::APPROVED.into(),
                    Transition::with_actions("toTest", [actions::MERGE_PR, actions::GIT_PULL]),
                ),
                (events::MERGE_FAILED.into(), Transition::to("toImprove")),
                (events::CHANGES_REQUESTED.into(), Transition::to("toImprove")),
                (events::MERGE_CONFLICT.into(), Transition::to("toImprove")),
            ]
            .into_iter()
            .collect(),
        },
    );
    states.insert(
        "reviewing".into(),
        State {
            state_type: StateType::Active,
            label: "Reviewing".into(),
            color: "#d4c5f9".into(),
            role: Some("reviewer".into()),
            priority: None,
            check: None,
            on: [
                (
                    events::APPROVE.into(),
                    Transition::with_actions("toTest", [actions::MERGE_PR, actions::GIT_PULL]),
                ),
                (events::REJECT.into(), Transition::to("toImprove")),
                (events::BLOCKED.into(), Transition::to("refining")),
            ]
            .into_iter()
            .collect(),
        },
    );
    states.insert(
        "toTest".into(),
        State {
            state_type: StateType::Queue,
            label: "To Test".into(),
            color: "#bfdadc".into(),
            role: Some("tester".into()),
            priority: Some(2),
            check: None,
            on: [(events::PICKUP.into(), Transition::to("testing"))].into_iter().collect(),
        },
    );
    states.insert(
        "testing".into(),
        State {
            state_type: StateType::Active,
            label: "Testing".into(),
            color: "#bfdadc".into(),
            role: Some("tester".into()),
            priority: None,
            check: None,
            on: [
                (events::PASS.into(), Transition::with_actions("done", [actions::CLOSE_ISSUE])),
                (events::FAIL.into(), Transition::with_actions("toImprove", [actions::REOPEN_ISSUE])),
                (events::REFINE.into(), Transition::to("refining")),
                (events::BLOCKED.into(), Transition::to("refining")),
            ]
            .into_iter()
            .collect(),
        },
    );
    states.insert(
        "done".into(),
        State {
            state_type: StateType::Terminal,
            label: "Done".into(),
            color: "#6f42c1".into(),
            role: None,
            priority: None,
            check: None,
            on: IndexMap::new(),
        },
    );
    states.insert(
        "toImprove".into(),
        State {
            state_type: StateType::Queue,
            label: "To Improve".into(),
            color: "#f9c2c2".into(),
            role: Some("developer".into()),
            priority: Some(3),
            check: None,
            on: [(events::PICKUP.into(), Transition::to("doing"))].into_iter().collect(),
        },
    );
    states.insert(
        "refining".into(),
        State {
            state_type: StateType::Hold,
            label: "Refining".into(),
            color: "#cccccc".into(),
            role: None,
            priority: None,
            check: None,
            on: [(events::APPROVE.into(), Transition::to("todo"))].into_iter().collect(),
        },
    );
    states.insert(
        "toResearch".into(),
        State {
            state_type: StateType::Queue,
            label: "To Research".into(),
            color: "#c2d4f9".into(),
            role: Some("architect".into()),
            priority: Some(1),
            check: None,
            on: [(events::PICKUP.into(), Transition::to("researching"))].into_iter().collect(),
        },
    );
    states.insert(
        "researching".into(),
        State {
            state_type: StateType::Active,
            label: "Researching".into(),
            color: "#c2d4f9".into(),
            role: Some("architect".into()),
            priority: None,
            check: None,
            on: [
                (events::COMPLETE.into(), Transition::to("planning")),
                (events::BLOCKED.into(), Transition::to("refining")),
            ]
            .into_iter()
            .collect(),
        },
    );

    Workflow {
        initial: "planning".into(),
        review_policy: ReviewPolicy::Auto,
        test_policy: TestPolicy::Skip,
        states,
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
