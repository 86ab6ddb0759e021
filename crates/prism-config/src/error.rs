//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or extract the provider chain.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the caller depends on lacks its required fields.
    #[error("Configuration section '{section}' is not configured (missing required fields)")]
    NotConfigured { section: String },

    /// A field parsed but holds a value Prism cannot use (zero port, zero timeout).
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
