use prism_core::FeatureFrame;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const fn yes() -> bool {
    true
}

/// A node of a flattened decision tree.
///
/// Children are addressed by index into [`Tree::nodes`]; the root is node 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: String,
        threshold: f64,
        left: usize,
        right: usize,
        /// Direction taken when the feature is null.
        #[serde(default = "yes")]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Children must point forward (`child > parent`), which rules out cycles
    /// and guarantees traversal terminates.
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                for child in [*left, *right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, frame: &FeatureFrame, row: usize) -> Result<f64, ModelError> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let go_left = frame
                        .number(row, feature)?
                        .map_or(*missing_left, |x| x < *threshold);
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Boosted ensembles: `base_score + Σ leaf`.
    #[default]
    Sum,
    /// Bagged ensembles (random forests): `base_score + mean(leaf)`.
    Mean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl TreeEnsemble {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("ensemble has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn predict_row(&self, frame: &FeatureFrame, row: usize) -> Result<f64, ModelError> {
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.leaf_value(frame, row)?;
        }
        Ok(match self.aggregation {
            Aggregation::Sum => self.base_score + total,
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
        })
    }
}
