use std::sync::Arc;

use anyhow::Context;
use prism_config::PrismConfig;
use prism_db::LibSqlFeatureSource;
use prism_embed::{EmbedService, PowerBiTokenProvider};
use prism_registry::Registry;

use crate::state::AppState;

pub fn load_config() -> anyhow::Result<PrismConfig> {
    PrismConfig::load_with_dotenv().context("failed to load configuration")
}

pub fn load_registry(config: &PrismConfig) -> anyhow::Result<Registry> {
    let root = &config.models.root;
    Registry::build(root)
        .with_context(|| format!("failed to build model registry from {}", root.display()))
}

pub fn warn_unconfigured(config: &PrismConfig) {
    if !config.powerbi.is_configured() {
        tracing::warn!("powerbi.report_id is not set; the report page will be empty");
    } else if !config.powerbi.can_mint_tokens() {
        tracing::warn!("Power BI service principal incomplete; embed tokens will be null");
    }
}

/// Registry, feature database, and token provider, in that order.
pub async fn build_state(config: &PrismConfig) -> anyhow::Result<AppState> {
    let registry = load_registry(config)?;
    if registry.is_empty() {
        tracing::warn!(root = %config.models.root.display(), "no model artifacts found");
    }

    let database = config.require_database()?;
    let features = LibSqlFeatureSource::open(database)
        .await
        .with_context(|| format!("failed to open feature database {}", database.describe()))?;

    let provider = PowerBiTokenProvider::new(config.powerbi.clone())
        .context("failed to build Power BI HTTP client")?;
    let embed = EmbedService::new(&config.powerbi, Arc::new(provider));

    Ok(AppState::new(
        Arc::new(registry),
        Arc::new(features),
        Arc::new(embed),
    ))
}
