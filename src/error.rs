//! Crate error type

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while preparing phrase pairs.
///
/// Failures propagate to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a dataset, word2vec or config file failed.
    #[error("io error on {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The config file is not valid json.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A word2vec file did not match the expected layout.
    #[error("malformed word2vec data at entry {entry}: {reason}")]
    Word2VecFormat { entry: usize, reason: String },

    /// Pretrained vectors and the requested embedding width disagree.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The left and right padded tensors do not share a shape.
    #[error("shape mismatch: left {left:?}, right {right:?}")]
    ShapeMismatch { left: (usize, usize), right: (usize, usize) },

    /// Nothing to predict on.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A csv input lacks a required header.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn format(entry: usize, reason: impl Into<String>) -> Self {
        Error::Word2VecFormat { entry, reason: reason.into() }
    }
}
