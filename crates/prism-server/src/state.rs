use std::sync::Arc;

use prism_db::FeatureSource;
use prism_embed::EmbedService;
use prism_registry::Registry;

use crate::predict::PredictionService;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub predictions: PredictionService,
    pub embed: Arc<EmbedService>,
}

impl AppState {
    pub fn new(
        registry: Arc<Registry>,
        features: Arc<dyn FeatureSource>,
        embed: Arc<EmbedService>,
    ) -> Self {
        Self {
            predictions: PredictionService::new(Arc::clone(&registry), features),
            registry,
            embed,
        }
    }
}
