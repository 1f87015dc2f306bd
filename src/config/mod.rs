// Configuration module entry point
// Loads layered configuration and builds the per-request application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, LogLevel, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the optional file,
    /// `VINOVAULT_*` environment variables, then `PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::build(Some(config_path), std::env::var("PORT").ok())
    }

    /// Built-in defaults plus `VINOVAULT_*` variables; no file, no `PORT`
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::build(None, None)
    }

    pub(crate) fn build(
        config_path: Option<&str>,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder
            .add_source(
                config::Environment::with_prefix("VINOVAULT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("site.document_root", ".")?
            .set_default("site.entry_document", "index.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "simple")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 60)?
            .set_default("performance.shutdown_timeout", 30)?;

        // PORT is the orchestrator's contract and wins over everything else
        if let Some(port) = port_override.filter(|p| !p.trim().is_empty()) {
            builder = builder.set_override("server.port", port.trim().to_string())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::InvalidAddress { addr, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MISSING: &str = "definitely-not-a-config-file";

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.site.document_root, ".");
        assert_eq!(cfg.site.entry_document, "index.html");
        assert_eq!(cfg.health, HealthConfig::default());
        assert_eq!(cfg.logging.level, LogLevel::Info);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "simple");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.shutdown_timeout, 30);
    }

    #[test]
    fn test_default_health_aliases() {
        let health = HealthConfig::default();
        assert_eq!(health.paths, vec!["/_health", "/ping"]);
        assert_eq!(health.user_agent_token, "GoogleHC");
    }

    #[test]
    fn test_port_override() {
        let cfg = Config::build(Some(MISSING), Some("9191".to_string())).unwrap();
        assert_eq!(cfg.server.port, 9191);
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "0.0.0.0:9191".parse().unwrap()
        );
    }

    #[test]
    fn test_blank_port_is_ignored() {
        let cfg = Config::build(Some(MISSING), Some("  ".to_string())).unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Config::build(Some(MISSING), Some("eighty".to_string())).is_err());
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("config.toml")).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 3000
workers = 2

[site]
document_root = "/srv/dist"

[health]
paths = ["/healthz"]

[logging]
level = "debug"
access_log_format = "json"
"#
        )
        .unwrap();

        // config::File::with_name resolves the extension itself
        let path = dir.path().join("config");
        let path = path.to_str().unwrap();

        let cfg = Config::build(Some(path), None).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.site.document_root, "/srv/dist");
        assert_eq!(cfg.site.entry_document, "index.html");
        assert_eq!(cfg.health.paths, vec!["/healthz"]);
        assert_eq!(cfg.health.user_agent_token, "GoogleHC");
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        assert_eq!(cfg.logging.access_log_format, "json");

        let cfg = Config::build(Some(path), Some("4000".to_string())).unwrap();
        assert_eq!(cfg.server.port, 4000);
    }

    #[test]
    fn test_invalid_host() {
        let mut cfg = Config::build(Some(MISSING), None).unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}
