use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session {0:?} timed out")]
    Timeout(String),
    #[error("session registry request failed: {0}")]
    Request(String),
}
