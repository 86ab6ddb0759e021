//! Power BI report embedding configuration.

use serde::{Deserialize, Serialize};

fn default_authority_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_api_url() -> String {
    "https://api.powerbi.com".to_string()
}

fn default_embed_base_url() -> String {
    "https://app.powerbi.com/reportEmbed".to_string()
}

/// Default timeout for each token request, in seconds.
const fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PowerBiConfig {
    /// Report to embed (GUID).
    #[serde(default)]
    pub report_id: String,

    /// Azure AD tenant that owns the service principal.
    #[serde(default)]
    pub tenant_id: String,

    /// Service principal application (client) id.
    #[serde(default)]
    pub client_id: String,

    /// Service principal secret.
    #[serde(default)]
    pub client_secret: String,

    /// Workspace (group) holding the report. Empty means "My workspace".
    #[serde(default)]
    pub workspace_id: String,

    /// Azure AD authority host.
    #[serde(default = "default_authority_url")]
    pub authority_url: String,

    /// Power BI REST API host.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base of the embed URL handed to the front end.
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PowerBiConfig {
    fn default() -> Self {
        Self {
            report_id: String::new(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            workspace_id: String::new(),
            authority_url: default_authority_url(),
            api_url: default_api_url(),
            embed_base_url: default_embed_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PowerBiConfig {
    /// A report id is enough to render the page (the token may still be null).
    pub fn is_configured(&self) -> bool {
        !self.report_id.is_empty()
    }

    /// Check if the service principal fields needed to mint embed tokens are set.
    pub fn can_mint_tokens(&self) -> bool {
        self.is_configured()
            && !self.tenant_id.is_empty()
            && !self.client_id.is_empty()
            && !self.client_secret.is_empty()
    }

    /// Strip accidental surrounding whitespace from identifiers.
    ///
    /// Values pasted into `.env` files often carry trailing spaces or newlines,
    /// which would otherwise end up inside the embed URL.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.report_id,
            &mut self.tenant_id,
            &mut self.client_id,
            &mut self.workspace_id,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = PowerBiConfig::default();
        assert!(!config.is_configured());
        assert!(!config.can_mint_tokens());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.embed_base_url, "https://app.powerbi.com/reportEmbed");
    }

    #[test]
    fn report_id_alone_renders_but_cannot_mint() {
        let config = PowerBiConfig {
            report_id: "r-1".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(!config.can_mint_tokens());
    }

    #[test]
    fn can_mint_tokens_when_principal_set() {
        let config = PowerBiConfig {
            report_id: "r-1".into(),
            tenant_id: "t-1".into(),
            client_id: "c-1".into(),
            client_secret: "s-1".into(),
            ..Default::default()
        };
        assert!(config.can_mint_tokens());
    }

    #[test]
    fn normalize_trims_identifiers() {
        let mut config = PowerBiConfig {
            report_id: "  abc-123\n".into(),
            tenant_id: "\ttenant ".into(),
            client_secret: " keep me ".into(),
            ..Default::default()
        };
        config.normalize();
        assert_eq!(config.report_id, "abc-123");
        assert_eq!(config.tenant_id, "tenant");
        // Secrets are opaque and left untouched.
        assert_eq!(config.client_secret, " keep me ");
    }
}
