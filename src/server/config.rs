use super::RequestsLoggingLevel;
use crate::catalog::PricingConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Served under `/assets` when set.
    pub assets_dir: Option<PathBuf>,
    pub pricing: PricingConfig,
    /// Seeds every request's random source, making prices reproducible.
    pub pricing_seed: Option<u64>,
    /// Upper bound for a single repository call.
    pub repository_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            assets_dir: None,
            pricing: PricingConfig::default(),
            pricing_seed: None,
            repository_timeout: Duration::from_secs(5),
        }
    }
}
