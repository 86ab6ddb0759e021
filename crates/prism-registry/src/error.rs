//! Registry, artifact, and model error types.

use std::path::PathBuf;

use prism_core::CoreError;
use thiserror::Error;

/// Fatal errors raised while building the registry at startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The artifact root does not exist or is not a directory.
    #[error("model root '{}' is not a directory", .0.display())]
    RootMissing(PathBuf),

    /// Directory traversal failed.
    #[error("failed to walk model root: {0}")]
    Walk(#[from] ignore::Error),

    /// An artifact could not be read, decoded, or validated.
    #[error("failed to load artifact '{}': {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },
}

/// Errors decoding a single artifact file.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact file is empty")]
    Empty,

    #[error("pickle decode failed: {0}")]
    Pickle(#[from] serde_pickle::Error),

    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload uses a container format Prism cannot read.
    #[error("unsupported artifact encoding: {0}")]
    Unsupported(String),

    /// The payload decoded but describes an unusable estimator.
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Errors raised by a predictor or transformer at request time.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Frame(#[from] CoreError),

    /// A required input column holds a null and the estimator has no
    /// missing-value rule for it.
    #[error("column '{column}' is null")]
    MissingValue { column: String },

    /// The estimator produced a non-finite value.
    #[error("prediction is not finite: {0}")]
    NotFinite(f64),
}
