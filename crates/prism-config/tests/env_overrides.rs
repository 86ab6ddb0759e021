//! Environment variable precedence tests.
//!
//! Uses `figment::Jail` for sandboxed env var manipulation and working directory.

use std::path::PathBuf;

use figment::Jail;
use pretty_assertions::assert_eq;
use prism_config::PrismConfig;

#[test]
fn legacy_names_fill_config_values() {
    Jail::expect_with(|jail| {
        jail.set_env("REPORT_ID", "f1c2-report");
        jail.set_env("TENANT_ID", "tenant-9");
        jail.set_env("SQL_HOST", "features-acme.turso.io");
        jail.set_env("SQL_DB", "analytics");
        jail.set_env("MODEL_ROOT", "/srv/models");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.powerbi.report_id, "f1c2-report");
        assert_eq!(config.powerbi.tenant_id, "tenant-9");
        assert_eq!(config.database.host, "features-acme.turso.io");
        assert_eq!(config.database.name, "analytics");
        assert_eq!(config.models.root, PathBuf::from("/srv/models"));
        Ok(())
    });
}

#[test]
fn prefixed_env_beats_legacy_names() {
    Jail::expect_with(|jail| {
        jail.set_env("REPORT_ID", "from-legacy");
        jail.set_env("PRISM_POWERBI__REPORT_ID", "from-prefixed");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.powerbi.report_id, "from-prefixed");
        Ok(())
    });
}

#[test]
fn report_id_whitespace_is_stripped() {
    Jail::expect_with(|jail| {
        jail.set_env("REPORT_ID", "  abc-123  ");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.powerbi.report_id, "abc-123");
        Ok(())
    });
}

#[test]
fn driver_defaults_when_unset() {
    Jail::expect_with(|_jail| {
        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.database.driver, prism_config::DEFAULT_DRIVER);
        Ok(())
    });
}

#[test]
fn driver_can_be_overridden() {
    Jail::expect_with(|jail| {
        jail.set_env("SQL_DRIVER", "ODBC Driver 18 for SQL Server");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.database.driver, "ODBC Driver 18 for SQL Server");
        Ok(())
    });
}

#[test]
fn server_port_parses_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("PRISM_SERVER__PORT", "8080");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.server.port, 8080);
        Ok(())
    });
}
