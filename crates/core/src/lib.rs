// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-core: the declarative workflow model, project/slot data model,
//! resolved-configuration shape, level heuristic, and deterministic
//! session-key derivation shared by every other `foreman-*` crate.

pub mod macros;

pub mod clock;
pub mod config;
pub mod level;
pub mod project;
pub mod session_key;
pub mod workflow;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ExecutionMode, ResolvedConfig, RoleConfig, Timeouts};
pub use level::{canonical_level, default_model_for_level, infer_level, resolve_model};
pub use project::{
    ChannelBinding, IssueId, Project, ProjectSlug, Provider, Registry, RoleWorker, SessionKey, Slot,
};
#[cfg(any(test, feature = "test-support"))]
pub use project::{ProjectBuilder, SlotBuilder};
pub use session_key::{is_subagent_session_key, session_key, slot_name_of};
pub use workflow::{
    default_workflow, resolve_review_routing, resolve_test_routing, CompletionRule, ReviewPolicy,
    ReviewRouting, State, StateType, TestPolicy, TestRouting, Transition, Workflow, WorkflowError,
};
