//! Feature database configuration.

use serde::{Deserialize, Serialize};

/// Driver name recorded when none is configured.
pub const DEFAULT_DRIVER: &str = "ODBC Driver 17 for SQL Server";

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_name() -> String {
    "features.db".to_string()
}

/// Where the feature table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Local libSQL file (or `:memory:`).
    Local { path: String },
    /// Remote libSQL/Turso endpoint.
    Remote { url: String, auth_token: String },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database host. Empty selects a local database file named by `name`.
    #[serde(default)]
    pub host: String,

    /// Database name; the file path when running against a local database.
    #[serde(default = "default_name")]
    pub name: String,

    /// Client driver name, reported in startup diagnostics.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Auth token for remote hosts.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            name: default_name(),
            driver: default_driver(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() || !self.name.is_empty()
    }

    pub fn is_remote(&self) -> bool {
        !self.host.is_empty()
    }

    /// Resolve the connection target.
    ///
    /// A host without a scheme is addressed as `libsql://{host}`.
    pub fn target(&self) -> DatabaseTarget {
        if self.is_remote() {
            let url = if self.host.contains("://") {
                self.host.clone()
            } else {
                format!("libsql://{}", self.host)
            };
            DatabaseTarget::Remote {
                url,
                auth_token: self.auth_token.clone(),
            }
        } else {
            DatabaseTarget::Local {
                path: self.name.clone(),
            }
        }
    }

    /// One-line description for logs. Never includes the auth token.
    pub fn describe(&self) -> String {
        match self.target() {
            DatabaseTarget::Local { path } => format!("local:{path} (driver: {})", self.driver),
            DatabaseTarget::Remote { url, .. } => format!("{url} (driver: {})", self.driver),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_to_local_file_and_odbc_driver_name() {
        let config = DatabaseConfig::default();
        assert!(config.is_configured());
        assert!(!config.is_remote());
        assert_eq!(config.driver, "ODBC Driver 17 for SQL Server");
        assert_eq!(
            config.target(),
            DatabaseTarget::Local {
                path: "features.db".into()
            }
        );
    }

    #[test]
    fn bare_host_gets_libsql_scheme() {
        let config = DatabaseConfig {
            host: "features-acme.turso.io".into(),
            auth_token: "tok".into(),
            ..Default::default()
        };
        assert_eq!(
            config.target(),
            DatabaseTarget::Remote {
                url: "libsql://features-acme.turso.io".into(),
                auth_token: "tok".into(),
            }
        );
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let config = DatabaseConfig {
            host: "http://127.0.0.1:8080".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.target(),
            DatabaseTarget::Remote { ref url, .. } if url == "http://127.0.0.1:8080"
        ));
    }

    #[test]
    fn describe_hides_token() {
        let config = DatabaseConfig {
            host: "db.example".into(),
            auth_token: "secret-token".into(),
            ..Default::default()
        };
        let text = config.describe();
        assert!(text.contains("libsql://db.example"));
        assert!(!text.contains("secret-token"));
    }
}
