//! Feature-transform artifacts.
//!
//! A pipeline is an ordered list of steps applied to the raw database row
//! before prediction. Steps are tagged by `op`.

use std::collections::BTreeMap;

use prism_core::{Cell, CoreError, FeatureFrame};
use serde::{Deserialize, Serialize};

use crate::Transformer;
use crate::error::ModelError;

/// One pipeline step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Keep exactly these columns, in this order.
    Select { columns: Vec<String> },
    /// Remove these columns if present.
    Drop { columns: Vec<String> },
    /// Replace nulls with a per-column constant.
    Impute { values: BTreeMap<String, f64> },
    /// `(x - mean) / scale`. A zero scale is treated as 1.
    StandardScale {
        mean: BTreeMap<String, f64>,
        scale: BTreeMap<String, f64>,
    },
    /// Expand a categorical column into `column=category` indicator columns.
    /// Unknown categories and nulls encode as all zeros.
    OneHot {
        column: String,
        categories: Vec<String>,
    },
}

impl Step {
    fn validate(&self) -> Result<(), String> {
        match self {
            Self::Select { columns } if columns.is_empty() => {
                Err("select step has no columns".into())
            }
            Self::StandardScale { mean, scale } => {
                if let Some(col) = mean.keys().find(|c| !scale.contains_key(*c)) {
                    return Err(format!("standard_scale has a mean but no scale for '{col}'"));
                }
                if mean.values().chain(scale.values()).any(|v| !v.is_finite()) {
                    return Err("standard_scale parameters must be finite".into());
                }
                Ok(())
            }
            Self::OneHot { categories, .. } if categories.is_empty() => {
                Err("one_hot step has no categories".into())
            }
            _ => Ok(()),
        }
    }

    fn apply(&self, frame: FeatureFrame) -> Result<FeatureFrame, CoreError> {
        match self {
            Self::Select { columns } => frame.select(columns),
            Self::Drop { columns } => Ok(frame.drop_columns(columns)),
            Self::Impute { values } => {
                let mut frame = frame;
                for (column, fill) in values {
                    if frame.column_index(column).is_none() {
                        continue;
                    }
                    frame.map_column(column, |cell| {
                        Ok(if cell.is_null() {
                            Cell::Real(*fill)
                        } else {
                            cell.clone()
                        })
                    })?;
                }
                Ok(frame)
            }
            Self::StandardScale { mean, scale } => {
                let mut frame = frame;
                for (column, mu) in mean {
                    let sigma = match scale.get(column) {
                        Some(s) if *s != 0.0 => *s,
                        _ => 1.0,
                    };
                    frame.map_column(column, |cell| {
                        if cell.is_null() {
                            return Ok(Cell::Null);
                        }
                        let x = cell.as_f64().ok_or_else(|| CoreError::NotNumeric {
                            column: column.clone(),
                            value: cell.to_string(),
                        })?;
                        Ok(Cell::Real((x - mu) / sigma))
                    })?;
                }
                Ok(frame)
            }
            Self::OneHot { column, categories } => {
                let names: Vec<String> = categories
                    .iter()
                    .map(|c| format!("{column}={c}"))
                    .collect();
                frame.expand_column(column, &names, |cell| {
                    let value = cell.as_text();
                    categories
                        .iter()
                        .map(|c| {
                            let hit = value.as_deref().map(str::trim) == Some(c.as_str());
                            Cell::Real(if hit { 1.0 } else { 0.0 })
                        })
                        .collect()
                })
            }
        }
    }
}

/// A decoded feature-transform artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureArtifact {
    pub steps: Vec<Step>,
}

impl FeatureArtifact {
    /// Structural checks run once at load time.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid step.
    pub fn validate(&self) -> Result<(), String> {
        for (i, step) in self.steps.iter().enumerate() {
            step.validate().map_err(|e| format!("step {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Transformer for FeatureArtifact {
    fn transform(&self, frame: &FeatureFrame) -> Result<FeatureFrame, ModelError> {
        self.steps
            .iter()
            .try_fold(frame.clone(), |acc, step| step.apply(acc))
            .map_err(ModelError::from)
    }
}
