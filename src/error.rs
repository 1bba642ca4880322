//! Error types for outline extraction and passage ranking.
//!
//! Per-document failures (`DocumentOpen`) are recovered by the pipeline and
//! degrade to an empty result for that document. `ModelNotFound` is fatal for
//! a ranking run.

use std::path::PathBuf;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction and ranking.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The layout collaborator could not open or parse a document
    #[error("Failed to open document {path}: {reason}")]
    DocumentOpen {
        /// Path of the document that failed
        path: PathBuf,
        /// Reason reported by the layout source
        reason: String,
    },

    /// No embedding model exists at any configured location
    #[error("Embedding model not found in any of: {}", format_paths(.0))]
    ModelNotFound(Vec<PathBuf>),

    /// Embedding model failed to load or run
    #[error("Model error: {0}")]
    Model(String),

    /// Malformed input artifact (collection description, config file)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The layout source cannot handle this kind of file
    #[error("Unsupported document source: {0}")]
    UnsupportedSource(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Build a [`Error::DocumentOpen`] from a path and anything displayable.
    pub fn document_open(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::DocumentOpen {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error must abort the whole invocation rather than a
    /// single document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ModelNotFound(_) | Error::Model(_))
    }
}
