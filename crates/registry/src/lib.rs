// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-registry: the project registry (C2) — persistent mapping from
//! project slug to its configuration, worker slots, and channel bindings
//! (§3.2, §4.2). Reads are lock-free over an atomic-replace file; writes
//! acquire a per-workspace in-process mutex.

pub mod atomic;
pub mod audit;
pub mod error;
pub mod store;

pub use audit::{AuditLog, AuditRecord};
pub use error::RegistryError;
pub use store::{Activation, RegistryStore};
