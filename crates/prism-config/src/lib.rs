//! # prism-config
//!
//! Layered configuration loading for Prism using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PRISM_*` prefix, `__` as separator)
//! 2. Un-prefixed deployment variables (`REPORT_ID`, `SQL_HOST`, ...)
//! 3. Project-level `prism.toml`
//! 4. User-level `~/.config/prism/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PRISM_POWERBI__REPORT_ID` -> `powerbi.report_id`,
//! `PRISM_DATABASE__HOST` -> `database.host`, etc. The un-prefixed names are
//! mapped explicitly, see [`LEGACY_ENV`].
//!
//! # Usage
//!
//! ```no_run
//! use prism_config::PrismConfig;
//!
//! let config = PrismConfig::load_with_dotenv().expect("config");
//! if config.powerbi.can_mint_tokens() {
//!     println!("embedding report {}", config.powerbi.report_id);
//! }
//! ```

mod database;
mod error;
mod models;
mod powerbi;
mod server;

pub use database::{DEFAULT_DRIVER, DatabaseConfig, DatabaseTarget};
pub use error::ConfigError;
pub use models::ModelsConfig;
pub use powerbi::PowerBiConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Un-prefixed environment variables and the config keys they fill.
pub const LEGACY_ENV: &[(&str, &str)] = &[
    ("REPORT_ID", "powerbi.report_id"),
    ("TENANT_ID", "powerbi.tenant_id"),
    ("CLIENT_ID", "powerbi.client_id"),
    ("CLIENT_SECRET", "powerbi.client_secret"),
    ("WORKSPACE_ID", "powerbi.workspace_id"),
    ("SQL_HOST", "database.host"),
    ("SQL_DB", "database.name"),
    ("SQL_DRIVER", "database.driver"),
    ("MODEL_ROOT", "models.root"),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrismConfig {
    #[serde(default)]
    pub powerbi: PowerBiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl PrismConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if a value is unusable.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if present) before building
    /// the figment. This is the entry point used by the server binary.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract, normalize, and validate a config from any figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;
        config.powerbi.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("prism.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: deployment variables without prefix
        figment = figment.merge(Self::legacy_env());

        // Layer 4: Prefixed environment variables (highest priority)
        figment.merge(Env::prefixed("PRISM_").split("__"))
    }

    /// Provider for the un-prefixed variables listed in [`LEGACY_ENV`].
    pub fn legacy_env() -> Env {
        let names: Vec<&str> = LEGACY_ENV.iter().map(|(name, _)| *name).collect();
        Env::raw().only(&names).map(legacy_key)
    }

    /// The database section, if it names a database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when both `database.host` and
    /// `database.name` are empty.
    pub fn require_database(&self) -> Result<&DatabaseConfig, ConfigError> {
        if self.database.is_configured() {
            Ok(&self.database)
        } else {
            Err(ConfigError::NotConfigured {
                section: "database".into(),
            })
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".into(),
                reason: "must be non-zero".into(),
            });
        }
        if self.powerbi.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "powerbi.timeout_secs".into(),
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prism").join("config.toml"))
    }
}

fn legacy_key(key: &UncasedStr) -> Uncased<'_> {
    LEGACY_ENV
        .iter()
        .find(|(name, _)| key == *name)
        .map_or_else(|| key.into(), |(_, path)| (*path).into())
}
