//! # prism-embed
//!
//! Power BI report embedding for Prism.
//!
//! [`EmbedService`] assembles the [`EmbedConfig`] the front end needs to embed
//! a report: the report id, its embed URL, and a view-only embed token when
//! one can be minted. Token minting sits behind the [`TokenProvider`] trait;
//! [`PowerBiTokenProvider`] implements it against Azure AD and the Power BI
//! REST API with a service principal.

pub mod error;
mod http;
pub mod powerbi;
pub mod service;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::TokenError;
pub use powerbi::PowerBiTokenProvider;
pub use service::{EmbedConfig, EmbedService};

/// A minted embed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedToken {
    pub token: String,
    /// When the token stops working, if the API reported it.
    pub expiration: Option<DateTime<Utc>>,
}

/// Result of asking for an embed token. Failure is an expected outcome, not
/// an error: the page still renders, only without a token.
#[derive(Debug)]
pub enum TokenOutcome {
    Issued(EmbedToken),
    Unavailable(TokenError),
}

impl TokenOutcome {
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        match self {
            Self::Issued(token) => Some(token.token),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub const fn is_issued(&self) -> bool {
        matches!(self, Self::Issued(_))
    }
}

/// Mints embed tokens for the configured report.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TokenError`] if the provider is not configured or any
    /// upstream call fails.
    async fn embed_token(&self) -> Result<EmbedToken, TokenError>;
}
