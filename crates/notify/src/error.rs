use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("chat delivery failed: {0}")]
    Delivery(String),
}
