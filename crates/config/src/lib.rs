// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-config: loads and merges the three-tier configuration document
//! (built-in defaults ← workspace ← project, §3.3, §4.9) into a
//! [`foreman_core::ResolvedConfig`].

mod builtin;
mod error;
mod loader;
mod merge;

pub use builtin::builtin_config;
pub use error::ConfigError;
pub use loader::load;
pub use merge::{merge_values, normalize_roles};
