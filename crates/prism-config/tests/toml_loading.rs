//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail`, which runs each closure in a fresh temporary working
//! directory, so `prism.toml` files created here are picked up by
//! [`PrismConfig::load`].

use std::path::PathBuf;

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use prism_config::{DatabaseTarget, PrismConfig};

#[test]
fn loads_all_sections_from_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "prism.toml",
            r#"
[powerbi]
report_id = "report-1"
tenant_id = "tenant-1"
client_id = "client-1"
client_secret = "secret-1"
workspace_id = "group-1"
timeout_secs = 30

[database]
host = "db.internal"
name = "analytics"
auth_token = "db-token"

[models]
root = "artifacts"

[server]
host = "127.0.0.1"
port = 9000
"#,
        )?;

        let config = PrismConfig::load().expect("config loads");

        assert_eq!(config.powerbi.report_id, "report-1");
        assert_eq!(config.powerbi.workspace_id, "group-1");
        assert_eq!(config.powerbi.timeout_secs, 30);
        assert!(config.powerbi.can_mint_tokens());
        assert_eq!(
            config.database.target(),
            DatabaseTarget::Remote {
                url: "libsql://db.internal".into(),
                auth_token: "db-token".into(),
            }
        );
        assert_eq!(config.models.root, PathBuf::from("artifacts"));
        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "prism.toml",
            r#"
[powerbi]
report_id = "from-toml"

[database]
name = "toml.db"
"#,
        )?;
        jail.set_env("SQL_DB", "legacy.db");
        jail.set_env("PRISM_POWERBI__REPORT_ID", "from-env");

        let config = PrismConfig::load().expect("config loads");
        assert_eq!(config.powerbi.report_id, "from-env");
        assert_eq!(config.database.name, "legacy.db");
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "prism.toml",
            r#"
[server]
port = 8081
"#,
        )?;

        let config: PrismConfig = Figment::from(Serialized::defaults(PrismConfig::default()))
            .merge(Toml::file("prism.toml"))
            .extract()?;

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.models.root, PathBuf::from("models"));
        assert_eq!(
            config.powerbi.authority_url,
            "https://login.microsoftonline.com"
        );
        Ok(())
    });
}

#[test]
fn malformed_toml_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file("prism.toml", "[server\nport = 1")?;
        assert!(PrismConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn zero_timeout_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PRISM_POWERBI__TIMEOUT_SECS", "0");
        let err = PrismConfig::load().unwrap_err();
        assert!(err.to_string().contains("powerbi.timeout_secs"));
        Ok(())
    });
}
