// Application state module
// Immutable per-process state shared by every request

use super::types::{Config, HealthConfig};
use crate::error::ServerError;
use crate::handler::{AssetReader, DiskReader, StaticSite};

/// Application state
#[derive(Debug)]
pub struct AppState<R = DiskReader> {
    pub site: StaticSite<R>,
    pub health: HealthConfig,
    pub access_log: bool,
    pub access_log_format: String,
}

impl AppState<DiskReader> {
    /// Create `AppState` serving the configured document root from disk
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let site = StaticSite::open(&config.site.document_root, &config.site.entry_document)?;
        Ok(Self::new(site, config))
    }
}

impl<R: AssetReader> AppState<R> {
    pub fn new(site: StaticSite<R>, config: &Config) -> Self {
        Self {
            site,
            health: config.health.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
        }
    }
}
