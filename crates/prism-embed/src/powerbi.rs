//! Power BI embed tokens via a service principal.
//!
//! Two calls per token:
//! 1. Azure AD client-credentials grant at
//!    `{authority}/{tenant_id}/oauth2/v2.0/token` for a Power BI API token.
//! 2. `GenerateToken` on the report, asking for view access.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prism_config::PowerBiConfig;
use serde::Deserialize;

use crate::error::TokenError;
use crate::http::check_response;
use crate::{EmbedToken, TokenProvider};

/// OAuth scope granting access to the Power BI REST API.
pub const POWERBI_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";

#[derive(Deserialize)]
struct AadTokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTokenResponse {
    token: String,
    #[serde(default)]
    expiration: Option<DateTime<Utc>>,
}

/// [`TokenProvider`] backed by Azure AD and the Power BI REST API.
pub struct PowerBiTokenProvider {
    http: reqwest::Client,
    config: PowerBiConfig,
}

impl PowerBiTokenProvider {
    /// Build a provider. Missing credentials are not an error here; they
    /// surface as [`TokenError::NotConfigured`] on each request.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PowerBiConfig) -> Result<Self, TokenError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("prism/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    fn missing_settings(&self) -> Vec<&'static str> {
        let c = &self.config;
        [
            ("report_id", &c.report_id),
            ("tenant_id", &c.tenant_id),
            ("client_id", &c.client_id),
            ("client_secret", &c.client_secret),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect()
    }

    fn authority_token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.authority_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.tenant_id)
        )
    }

    fn generate_token_url(&self) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        let report = urlencoding::encode(&self.config.report_id);
        if self.config.workspace_id.is_empty() {
            format!("{base}/v1.0/myorg/reports/{report}/GenerateToken")
        } else {
            format!(
                "{base}/v1.0/myorg/groups/{}/reports/{report}/GenerateToken",
                urlencoding::encode(&self.config.workspace_id)
            )
        }
    }

    async fn aad_token(&self) -> Result<String, TokenError> {
        let resp = self
            .http
            .post(self.authority_token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("scope", POWERBI_SCOPE),
            ])
            .send()
            .await?;
        let body: AadTokenResponse = check_response(resp)
            .await?
            .json()
            .await
            .map_err(|e| TokenError::Parse(format!("AAD token response: {e}")))?;
        Ok(body.access_token)
    }
}

#[async_trait]
impl TokenProvider for PowerBiTokenProvider {
    async fn embed_token(&self) -> Result<EmbedToken, TokenError> {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            return Err(TokenError::NotConfigured(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        let access_token = self.aad_token().await?;
        let resp = self
            .http
            .post(self.generate_token_url())
            .bearer_auth(&access_token)
            .json(&serde_json::json!({"accessLevel": "View"}))
            .send()
            .await?;
        let body: GenerateTokenResponse = check_response(resp)
            .await?
            .json()
            .await
            .map_err(|e| TokenError::Parse(format!("GenerateToken response: {e}")))?;

        tracing::debug!(expiration = ?body.expiration, "embed token minted");
        Ok(EmbedToken {
            token: body.token,
            expiration: body.expiration,
        })
    }
}
