use std::collections::BTreeMap;

use prism_core::FeatureFrame;
use serde::{Deserialize, Serialize};

use super::required;
use crate::error::ModelError;

/// Ordinary linear regression: `intercept + Σ wᵢ·xᵢ`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearModel {
    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_weights(&self.coefficients, self.intercept)
    }

    pub(crate) fn predict_row(&self, frame: &FeatureFrame, row: usize) -> Result<f64, ModelError> {
        score(&self.coefficients, self.intercept, frame, row)
    }
}

/// What a logistic model reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticOutput {
    /// `1.0` when the probability reaches the threshold, else `0.0`.
    #[default]
    Label,
    Probability,
}

const fn default_threshold() -> f64 {
    0.5
}

/// Binary logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub output: LogisticOutput,
}

impl LogisticModel {
    pub(crate) fn validate(&self) -> Result<(), String> {
        validate_weights(&self.coefficients, self.intercept)?;
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} outside [0, 1]", self.threshold));
        }
        Ok(())
    }

    pub(crate) fn predict_row(&self, frame: &FeatureFrame, row: usize) -> Result<f64, ModelError> {
        let z = score(&self.coefficients, self.intercept, frame, row)?;
        let p = 1.0 / (1.0 + (-z).exp());
        Ok(match self.output {
            LogisticOutput::Probability => p,
            LogisticOutput::Label => {
                if p >= self.threshold {
                    1.0
                } else {
                    0.0
                }
            }
        })
    }
}

fn validate_weights(coefficients: &BTreeMap<String, f64>, intercept: f64) -> Result<(), String> {
    if coefficients.is_empty() {
        return Err("no coefficients".into());
    }
    if let Some((name, _)) = coefficients.iter().find(|(_, w)| !w.is_finite()) {
        return Err(format!("coefficient for '{name}' is not finite"));
    }
    if !intercept.is_finite() {
        return Err("intercept is not finite".into());
    }
    Ok(())
}

fn score(
    coefficients: &BTreeMap<String, f64>,
    intercept: f64,
    frame: &FeatureFrame,
    row: usize,
) -> Result<f64, ModelError> {
    coefficients
        .iter()
        .try_fold(intercept, |acc, (column, w)| -> Result<f64, ModelError> {
            Ok(w.mul_add(required(frame, row, column)?, acc))
        })
}
