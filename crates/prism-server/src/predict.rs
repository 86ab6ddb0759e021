//! Prediction requests: validation, feature lookup, and inference.

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prism_core::{CoreError, ModelId};
use prism_db::{DatabaseError, FeatureSource};
use prism_registry::{ModelError, Registry};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

const REQUIRED: &str = "sample_id and model_id required";
const NOT_AN_INTEGER: &str = "sample_id must be an integer";

/// Errors a prediction request can end in.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("model_id '{model_id}' not found")]
    UnknownModel {
        model_id: String,
        available: Vec<ModelId>,
    },

    #[error("sample_id not found")]
    SampleNotFound,

    #[error("feature lookup failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("inference failed: {0}")]
    Model(#[from] ModelError),
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::UnknownModel { available, .. } => (
                StatusCode::BAD_REQUEST,
                json!({"error": self.to_string(), "available": available}),
            ),
            Self::SampleNotFound => (StatusCode::NOT_FOUND, json!({"error": self.to_string()})),
            Self::Database(_) | Self::Model(_) => {
                tracing::error!(error = %self, "prediction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal server error"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Body of `POST /predict`. Both fields are loosely typed on the wire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub sample_id: Option<Value>,
    #[serde(default)]
    pub model_id: Option<Value>,
}

impl PredictRequest {
    /// Parse a request body. Anything that is not a JSON object reads as `{}`.
    #[must_use]
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub model_id: ModelId,
    pub prediction: f64,
}

/// Absent, `null`, `false`, zero, and empty strings, arrays, or objects.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

fn model_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Integer, integral float, or a string holding an integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce_sample_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Runs predictions against the registry and the feature source.
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<Registry>,
    features: Arc<dyn FeatureSource>,
}

impl PredictionService {
    pub fn new(registry: Arc<Registry>, features: Arc<dyn FeatureSource>) -> Self {
        Self { registry, features }
    }

    /// One feature lookup and one model invocation per call.
    pub async fn predict(&self, request: &PredictRequest) -> Result<Prediction, PredictError> {
        let (Some(sample), Some(model)) = (&request.sample_id, &request.model_id) else {
            return Err(PredictError::InvalidRequest(REQUIRED));
        };
        if !is_truthy(Some(sample)) || !is_truthy(Some(model)) {
            return Err(PredictError::InvalidRequest(REQUIRED));
        }

        let key = model_key(model);
        let entry = self
            .registry
            .get(&key)
            .ok_or_else(|| PredictError::UnknownModel {
                model_id: key.clone(),
                available: self.registry.ids(),
            })?;

        let sample_id =
            coerce_sample_id(sample).ok_or(PredictError::InvalidRequest(NOT_AN_INTEGER))?;

        let raw = self.features.fetch_sample(sample_id).await?;
        if raw.is_empty() {
            return Err(PredictError::SampleNotFound);
        }
        let raw = raw.head(1);

        let inputs = match &entry.features {
            Some(pipeline) => pipeline.transform(&raw)?,
            None => raw,
        };
        let prediction = entry
            .model
            .predict(&inputs)?
            .first()
            .copied()
            .ok_or_else(|| {
                ModelError::from(CoreError::Validation("predictor returned no values".into()))
            })?;
        if !prediction.is_finite() {
            return Err(ModelError::NotFinite(prediction).into());
        }

        tracing::info!(model_id = %entry.model_id, sample_id, prediction, "prediction served");
        Ok(Prediction {
            model_id: entry.model_id.clone(),
            prediction,
        })
    }
}
