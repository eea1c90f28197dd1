use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("workspace I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry deserialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project {0:?} is not registered")]
    UnknownProject(String),
}
