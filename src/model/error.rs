//! Model error types

use std::path::PathBuf;
use thiserror::Error;

use crate::features::ValidationError;

/// Failure to turn a submission into a prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{stage} expected {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed model: {0}")]
    MalformedModel(String),
}

/// Failure to load a model or scaler artifact at startup
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported artifact format for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("incompatible artifact {}: {reason}", path.display())]
    Incompatible { path: PathBuf, reason: String },
}
