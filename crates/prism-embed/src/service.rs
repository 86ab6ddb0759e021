//! Embed configuration assembly.

use std::sync::Arc;

use prism_config::PowerBiConfig;
use serde::{Deserialize, Serialize};

use crate::{TokenOutcome, TokenProvider};

/// What the front end needs to embed the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    pub report_id: String,
    pub embed_url: String,
    /// `null` when no token could be minted.
    pub access_token: Option<String>,
}

/// Builds [`EmbedConfig`]s for the configured report.
pub struct EmbedService {
    report_id: String,
    embed_url: String,
    provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for EmbedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedService")
            .field("report_id", &self.report_id)
            .field("embed_url", &self.embed_url)
            .finish_non_exhaustive()
    }
}

impl EmbedService {
    /// Capture the report id once. `config` should already be normalized.
    #[must_use]
    pub fn new(config: &PowerBiConfig, provider: Arc<dyn TokenProvider>) -> Self {
        let report_id = config.report_id.trim().to_string();
        let embed_url = embed_url(&config.embed_base_url, &report_id);
        Self {
            report_id,
            embed_url,
            provider,
        }
    }

    #[must_use]
    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    #[must_use]
    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    /// Ask the provider for a token. Failures are logged and folded into
    /// [`TokenOutcome::Unavailable`].
    pub async fn acquire_token(&self) -> TokenOutcome {
        match self.provider.embed_token().await {
            Ok(token) => TokenOutcome::Issued(token),
            Err(error) => {
                tracing::warn!(%error, report_id = %self.report_id, "embed token unavailable");
                TokenOutcome::Unavailable(error)
            }
        }
    }

    /// Current embed configuration. Never fails; the token is `None` when
    /// it cannot be minted.
    pub async fn embed_config(&self) -> EmbedConfig {
        EmbedConfig {
            report_id: self.report_id.clone(),
            embed_url: self.embed_url.clone(),
            access_token: self.acquire_token().await.into_token(),
        }
    }
}

/// `{base}?reportId={report_id}` with the id percent-encoded.
#[must_use]
pub fn embed_url(base: &str, report_id: &str) -> String {
    format!("{base}?reportId={}", urlencoding::encode(report_id))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{EmbedToken, TokenError};

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl TokenProvider for Fixed {
        async fn embed_token(&self) -> Result<EmbedToken, TokenError> {
            self.0
                .map(|t| EmbedToken {
                    token: t.to_string(),
                    expiration: None,
                })
                .ok_or_else(|| TokenError::Parse("no token in response".into()))
        }
    }

    fn service(token: Option<&'static str>) -> EmbedService {
        let config = PowerBiConfig {
            report_id: " 8f2c-41 ".into(),
            ..Default::default()
        };
        EmbedService::new(&config, Arc::new(Fixed(token)))
    }

    #[tokio::test]
    async fn config_carries_issued_token() {
        let config = service(Some("tok")).embed_config().await;
        assert_eq!(
            config,
            EmbedConfig {
                report_id: "8f2c-41".into(),
                embed_url: "https://app.powerbi.com/reportEmbed?reportId=8f2c-41".into(),
                access_token: Some("tok".into()),
            }
        );
    }

    #[tokio::test]
    async fn failure_yields_null_token() {
        let svc = service(None);
        assert!(!svc.acquire_token().await.is_issued());

        let json = serde_json::to_value(svc.embed_config().await).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "reportId": "8f2c-41",
                "embedUrl": "https://app.powerbi.com/reportEmbed?reportId=8f2c-41",
                "accessToken": null,
            })
        );
    }

    #[test]
    fn embed_url_encodes_report_id() {
        assert_eq!(embed_url("https://x/embed", "a b&c"), "https://x/embed?reportId=a%20b%26c");
    }
}
