//! Embed-token error types.

use thiserror::Error;

/// Errors that can occur while minting a Power BI embed token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Required service-principal settings are missing. No request was sent.
    #[error("Power BI token provider not configured: {0}")]
    NotConfigured(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Azure AD or the Power BI API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// A success response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}
