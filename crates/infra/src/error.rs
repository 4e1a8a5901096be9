use std::path::PathBuf;

use thiserror::Error;

use taxclass_core::DomainError;

/// Infrastructure-level failures (files, JSON, environment).
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to read or write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
