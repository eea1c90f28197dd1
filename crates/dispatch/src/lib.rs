// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-dispatch: the dispatch pipeline (C5, §4.5) — the idempotent
//! commitment sequence that moves one issue from a queue state into an
//! active state, plus the acknowledgement, labeling, and task-message
//! machinery it drives.

pub mod acknowledge;
pub mod attachments;
pub mod error;
pub mod input;
pub mod labels;
pub mod message;
pub mod pipeline;
pub mod role_prompt;

pub use error::DispatchError;
pub use input::{DispatchInput, DispatchOutput, SessionAction};
pub use pipeline::{Background, DispatchOutcome, DispatchPipeline};
