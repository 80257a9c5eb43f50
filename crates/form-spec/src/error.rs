use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading form definitions or request data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("failed to parse json: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid form definition: {0}")]
    InvalidDefinition(String),
}
