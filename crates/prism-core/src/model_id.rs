//! Registry key derived from a model artifact's file name.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Sanitized model identifier.
///
/// Built from an artifact's file stem by replacing every run of whitespace
/// with a single underscore, so `"random forest model"` becomes
/// `"random_forest_model"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Sanitize a file stem into a model id.
    #[must_use]
    pub fn from_stem(stem: &str) -> Self {
        let mut out = String::with_capacity(stem.len());
        let mut in_whitespace = false;
        for ch in stem.chars() {
            if ch.is_whitespace() {
                if !in_whitespace {
                    out.push('_');
                }
                in_whitespace = true;
            } else {
                out.push(ch);
                in_whitespace = false;
            }
        }
        Self(out)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::from_stem(&s))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("xgboost_model", "xgboost_model")]
    #[case("random forest model", "random_forest_model")]
    #[case("knn \t  regressor", "knn_regressor")]
    #[case(" leading model", "_leading_model")]
    #[case("trailing model\n", "trailing_model_")]
    #[case("", "")]
    fn sanitizes_whitespace_runs(#[case] stem: &str, #[case] expected: &str) {
        assert_eq!(ModelId::from_stem(stem).as_str(), expected);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ModelId::from_stem("svm classifier");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""svm_classifier""#);
    }

    #[test]
    fn deserializing_sanitizes() {
        let id: ModelId = serde_json::from_str(r#""random forest  model""#).unwrap();
        assert_eq!(id.as_str(), "random_forest_model");
    }
}
