//! Error type for the knowledge engine.

use std::path::PathBuf;

/// Errors surfaced by [`KnowledgeStore`](super::store::KnowledgeStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Creating, reading, or writing the profile document failed.
    #[error("storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// An import payload did not look like a knowledge base document.
    #[error("invalid knowledge base format: {0}")]
    Format(String),
}

impl KnowledgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
