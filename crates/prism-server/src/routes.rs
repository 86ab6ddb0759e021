use std::any::Any;
use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use prism_core::ModelId;
use prism_embed::EmbedConfig;
use prism_registry::Registry;
use serde::Serialize;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::page::render_index;
use crate::predict::{PredictError, PredictRequest, Prediction};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/embed-config", get(embed_config))
        .route("/models", get(models))
        .route("/healthz", get(healthz))
        .route("/predict", post(predict))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal server error"})),
    )
        .into_response()
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = message, "request handler panicked");
    internal_error()
}

async fn index(State(state): State<AppState>) -> Response {
    let config = state.embed.embed_config().await;
    match render_index(&config) {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            tracing::error!(%error, "failed to render index page");
            internal_error()
        }
    }
}

async fn embed_config(State(state): State<AppState>) -> Json<EmbedConfig> {
    Json(state.embed.embed_config().await)
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub model_id: ModelId,
    pub source_path: PathBuf,
    pub features_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ModelListing {
    pub models: Vec<ModelSummary>,
}

impl ModelListing {
    pub fn from_registry(registry: &Registry) -> Self {
        Self {
            models: registry
                .entries()
                .into_iter()
                .map(|e| ModelSummary {
                    model_id: e.model_id.clone(),
                    source_path: e.source_path.clone(),
                    features_path: e.features_path.clone(),
                })
                .collect(),
        }
    }
}

async fn models(State(state): State<AppState>) -> Json<ModelListing> {
    Json(ModelListing::from_registry(&state.registry))
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "models": state.registry.len()}))
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Prediction>, PredictError> {
    let request = PredictRequest::from_body(&body);
    state.predictions.predict(&request).await.map(Json)
}
