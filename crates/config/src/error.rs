//! Config-loading errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("serializing built-in defaults")]
    Serialize(#[source] serde_yaml::Error),
    #[error("resolving merged document into a config")]
    Deserialize(#[source] serde_yaml::Error),
    #[error(transparent)]
    Workflow(#[from] foreman_core::WorkflowError),
}

impl ConfigError {
    pub(crate) fn serialize(source: serde_yaml::Error) -> Self {
        Self::Serialize(source)
    }

    pub(crate) fn deserialize(source: serde_yaml::Error) -> Self {
        Self::Deserialize(source)
    }
}
