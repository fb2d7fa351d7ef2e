//! Error taxonomy shared by the classifier core, store and persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for classifier results.
pub type Result<T, E = ClassifierError> = std::result::Result<T, E>;

/// Failures surfaced by the intent classifier. Nothing is swallowed or
/// replaced by a default prediction; callers decide whether to skip an item.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Training document does not have the expected structure.
    #[error("malformed training data: {0}")]
    Schema(String),
    /// A single training element carries a missing or non-string field.
    #[error("invalid training example at index {index}: {reason}")]
    InvalidExample { index: usize, reason: String },
    /// Embedding or fitting failed; no artifact is produced.
    #[error("training failed: {0}")]
    Training(String),
    /// The artifact is foreign, corrupted or internally inconsistent.
    #[error("artifact type mismatch: {0}")]
    TypeMismatch(String),
    /// Embedding or scoring failed for one prediction call.
    #[error("inference failed: {0}")]
    Inference(String),
    /// A file could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClassifierError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// `linfa::traits::Fit` requires the error type to absorb linfa's own errors.
impl From<linfa::Error> for ClassifierError {
    fn from(err: linfa::Error) -> Self {
        Self::Training(err.to_string())
    }
}

/// Failure raised by a [`crate::nlp::vectorizer::Vectorizer`].
#[derive(Debug, Error)]
#[error("vectorizer error: {0}")]
pub struct VectorizeError(pub String);
