use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("issue {0:?} not found")]
    NotFound(String),
    #[error("PR for issue {0:?} is not mergeable")]
    NotMergeable(String),
    #[error("tracker request failed: {0}")]
    Request(String),
}
