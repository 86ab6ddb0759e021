//! # prism-registry
//!
//! Model artifact discovery and the startup model registry.
//!
//! At startup [`Registry::build`] walks the artifact root, picks out model
//! artifacts by file name, pairs each with a feature-transform artifact from
//! the same directory, and decodes both. The result is an immutable
//! `ModelId -> ModelEntry` map shared by every request.

pub mod artifact;
pub mod error;
pub mod model;
pub mod registry;
pub mod scan;
pub mod transform;

use prism_core::FeatureFrame;

pub use error::{ArtifactError, ModelError, RegistryError};
pub use model::ModelArtifact;
pub use registry::{ModelEntry, Registry};
pub use transform::{FeatureArtifact, Step};

/// A fitted estimator: one prediction per input row.
pub trait Predictor: Send + Sync + std::fmt::Debug {
    /// # Errors
    ///
    /// Returns [`ModelError`] if a required input is missing or not numeric,
    /// or the estimator produces a non-finite value.
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, ModelError>;
}

/// A fitted feature pipeline mapping raw rows to model inputs.
pub trait Transformer: Send + Sync + std::fmt::Debug {
    /// # Errors
    ///
    /// Returns [`ModelError`] if a step cannot be applied to the frame.
    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame, ModelError>;
}
