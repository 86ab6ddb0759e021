//! Predictor artifacts.
//!
//! Each artifact kind is a fitted estimator exported as a plain document with
//! a `kind` tag. Inputs are resolved by column name, so a predictor can be fed
//! either a transformed frame or the raw database row.

mod knn;
mod linear;
mod tree;

pub use knn::{KnnModel, Weighting};
pub use linear::{LinearModel, LogisticModel, LogisticOutput};
pub use tree::{Aggregation, Node, Tree, TreeEnsemble};

use prism_core::FeatureFrame;
use serde::{Deserialize, Serialize};

use crate::Predictor;
use crate::error::ModelError;

/// A decoded model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
    Knn(KnnModel),
}

impl ModelArtifact {
    /// Short name of the estimator kind, for logs and listings.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Logistic(_) => "logistic",
            Self::TreeEnsemble(_) => "tree_ensemble",
            Self::Knn(_) => "knn",
        }
    }

    /// Structural checks run once at load time.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::Logistic(m) => m.validate(),
            Self::TreeEnsemble(m) => m.validate(),
            Self::Knn(m) => m.validate(),
        }
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, ModelError> {
        let predictions = (0..frame.len())
            .map(|row| match self {
                Self::Linear(m) => m.predict_row(frame, row),
                Self::Logistic(m) => m.predict_row(frame, row),
                Self::TreeEnsemble(m) => m.predict_row(frame, row),
                Self::Knn(m) => m.predict_row(frame, row),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(bad) = predictions.iter().find(|p| !p.is_finite()) {
            return Err(ModelError::NotFinite(*bad));
        }
        Ok(predictions)
    }
}

/// Read a required numeric input.
pub(crate) fn required(frame: &FeatureFrame, row: usize, column: &str) -> Result<f64, ModelError> {
    frame
        .number(row, column)?
        .ok_or_else(|| ModelError::MissingValue {
            column: column.to_string(),
        })
}
