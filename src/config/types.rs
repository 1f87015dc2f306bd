// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub health: HealthConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static site configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory the bundle is served from
    pub document_root: String,
    /// SPA shell, relative to the document root
    pub entry_document: String,
}

/// Liveness probe configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HealthConfig {
    /// Reserved probe paths (default: /_health, /ping)
    #[serde(default = "default_health_paths")]
    pub paths: Vec<String>,
    /// User-Agent substring sent by the orchestrator's health checker
    #[serde(default = "default_user_agent_token")]
    pub user_agent_token: String,
}

fn default_health_paths() -> Vec<String> {
    vec!["/_health".to_string(), "/ping".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_user_agent_token() -> String {
    "GoogleHC".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            paths: default_health_paths(),
            user_agent_token: default_user_agent_token(),
        }
    }
}

/// Log verbosity, ordered from quietest to loudest
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub access_log: bool,
    /// Access log format (simple, combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "simple".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for reading a request head; responses are never cut short
    pub connection_timeout: u64,
    pub max_connections: Option<u64>,
    /// How long in-flight connections may drain after a shutdown signal
    pub shutdown_timeout: u64,
}
