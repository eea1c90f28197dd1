//! Heartbeat-level errors (§7): only the registry layer's own I/O failures
//! are "fatal" in the sense of aborting a project for the remainder of the
//! tick; every other per-project or per-issue failure is caught, logged,
//! and folded into the tick's counts by the caller, never propagated here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeartbeatError {
    #[error("registry workspace error: {0}")]
    Registry(#[from] foreman_registry::RegistryError),
    #[error("config error: {0}")]
    Config(#[from] foreman_config::ConfigError),
    #[error("health checker error: {0}")]
    Health(#[from] foreman_health::HealthError),
    #[error("workflow error: {0}")]
    Workflow(#[from] foreman_core::WorkflowError),
    #[error("tracker error: {0}")]
    Tracker(#[from] foreman_tracker::TrackerError),
    #[error("dispatch error: {0}")]
    Dispatch(#[from] foreman_dispatch::DispatchError),
}
