// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-heartbeat: the periodic control loop (C7, §4.7) that reconciles
//! tracker labels, internal worker state, and the LLM session registry,
//! picks up queued work, fills worker slots, advances issues whose
//! external condition has been met, and auto-repairs inconsistencies.
//!
//! One [`HeartbeatEngine::tick`] reconciles every project in the registry,
//! in order: health pass, review pass, pickup pass, then a single
//! once-per-tick orphaned-session sweep across all projects.

mod engine;
mod error;
mod git;
mod level_label;
mod pickup;
mod queue;
mod review;
mod slot_alloc;
mod summary;

pub use engine::HeartbeatEngine;
pub use error::HeartbeatError;
pub use git::{GitPuller, GitPullError, NoopGitPuller};
pub use summary::{ProjectTickSummary, TickSummary};

#[cfg(any(test, feature = "test-support"))]
pub use git::fake::FakeGitPuller;
