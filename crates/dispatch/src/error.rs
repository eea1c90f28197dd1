use thiserror::Error;

/// Errors from the dispatch pipeline (§4.5, §7). Only the Phase 2
/// commitment step's failure is meaningful to the caller as an abort
/// signal — everything upstream of it (Phase 1) and downstream of it
/// (Phase 3) is absorbed by the pipeline itself and never surfaces here.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("role {0:?} is not configured or is disabled")]
    UnknownRole(String),
    #[error("role {role:?} has no configured level {level:?} and none could be inferred")]
    UnknownLevel { role: String, level: String },
    #[error("committing the label transition {from:?} -> {to:?} for issue {iid}: {source}")]
    Commitment { iid: String, from: String, to: String, source: foreman_tracker::TrackerError },
    #[error("registry workspace error: {0}")]
    Registry(#[from] foreman_registry::RegistryError),
}
