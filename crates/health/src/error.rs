use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("tracker request failed: {0}")]
    Tracker(#[from] foreman_tracker::TrackerError),
    #[error("registry workspace error: {0}")]
    Registry(#[from] foreman_registry::RegistryError),
    #[error("workflow error: {0}")]
    Workflow(#[from] foreman_core::WorkflowError),
}
