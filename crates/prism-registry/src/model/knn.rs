use prism_core::FeatureFrame;
use serde::{Deserialize, Serialize};

use super::required;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    #[default]
    Uniform,
    /// Inverse-distance weights. Exact matches take all the weight.
    Distance,
}

/// k-nearest-neighbours regressor over stored training points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnModel {
    pub k: usize,
    /// Input columns, in the order used by `points`.
    pub features: Vec<String>,
    pub points: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    #[serde(default)]
    pub weighting: Weighting,
}

impl KnnModel {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.k == 0 {
            return Err("k must be at least 1".into());
        }
        if self.features.is_empty() {
            return Err("no feature columns".into());
        }
        if self.points.len() != self.targets.len() {
            return Err(format!(
                "{} points but {} targets",
                self.points.len(),
                self.targets.len()
            ));
        }
        if self.points.len() < self.k {
            return Err(format!("k = {} exceeds {} stored points", self.k, self.points.len()));
        }
        if let Some(i) = self
            .points
            .iter()
            .position(|p| p.len() != self.features.len())
        {
            return Err(format!(
                "point {i} has {} values, expected {}",
                self.points[i].len(),
                self.features.len()
            ));
        }
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn predict_row(&self, frame: &FeatureFrame, row: usize) -> Result<f64, ModelError> {
        let query = self
            .features
            .iter()
            .map(|c| required(frame, row, c))
            .collect::<Result<Vec<_>, _>>()?;

        let mut neighbours: Vec<(f64, f64)> = self
            .points
            .iter()
            .zip(&self.targets)
            .map(|(point, target)| (euclidean(point, &query), *target))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbours.truncate(self.k);

        match self.weighting {
            Weighting::Uniform => {
                Ok(neighbours.iter().map(|(_, t)| t).sum::<f64>() / neighbours.len() as f64)
            }
            Weighting::Distance => {
                let exact: Vec<f64> = neighbours
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, t)| *t)
                    .collect();
                if !exact.is_empty() {
                    return Ok(exact.iter().sum::<f64>() / exact.len() as f64);
                }
                let (weighted, weights) = neighbours
                    .iter()
                    .fold((0.0, 0.0), |(num, den), (d, t)| (num + t / d, den + 1.0 / d));
                Ok(weighted / weights)
            }
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use prism_core::Cell;

    use super::*;

    fn model(k: usize, weighting: Weighting) -> KnnModel {
        KnnModel {
            k,
            features: vec!["x".into(), "y".into()],
            points: vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![10.0, 10.0]],
            targets: vec![2.0, 4.0, 100.0],
            weighting,
        }
    }

    fn at(x: f64, y: f64) -> FeatureFrame {
        FeatureFrame::from_rows(
            vec!["x".into(), "y".into()],
            vec![vec![Cell::Real(x), Cell::Real(y)]],
        )
        .unwrap()
    }

    #[test]
    fn uniform_averages_k_nearest() {
        let m = model(2, Weighting::Uniform);
        m.validate().unwrap();
        assert_eq!(m.predict_row(&at(0.25, 0.0), 0).unwrap(), 3.0);
    }

    #[test]
    fn distance_weighting_favours_closer_points() {
        // d = 0.25 and 0.75: weights 4 and 4/3 -> (8 + 16/3) / (16/3) = 2.5
        let p = model(2, Weighting::Distance)
            .predict_row(&at(0.25, 0.0), 0)
            .unwrap();
        assert!((p - 2.5).abs() < 1e-12);
    }

    #[test]
    fn exact_match_takes_all_weight() {
        let p = model(3, Weighting::Distance)
            .predict_row(&at(1.0, 0.0), 0)
            .unwrap();
        assert_eq!(p, 4.0);
    }

    #[test]
    fn validate_checks_shapes() {
        let mut m = model(4, Weighting::Uniform);
        assert!(m.validate().unwrap_err().contains("exceeds"));
        m.k = 1;
        m.points[1] = vec![1.0];
        assert!(m.validate().unwrap_err().contains("point 1"));
    }
}
