// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-health: the health checker (C6, §4.6). Triangulates a slot's
//! active flag, tracker label, and session liveness into zero or one
//! anomaly, plus the two sweeps (orphaned label, orphaned session) that
//! catch what per-slot triangulation cannot see on its own.

mod checker;
mod error;
mod orphan;
mod types;

pub use checker::{HealthChecker, GRACE_PERIOD_MS};
pub use error::HealthError;
pub use orphan::scan_orphaned_sessions;
pub use types::{Anomaly, AnomalyKind, HealthFix, Severity};
