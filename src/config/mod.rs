mod file_config;

pub use file_config::{FileConfig, PricingFileConfig};

use crate::catalog::pricing::{DEFAULT_JITTER_DOLLARS, DEFAULT_SPECIAL_EDITION_MODULUS};
use crate::catalog::PricingConfig;
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REPOSITORY_TIMEOUT_MS: u64 = 5000;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub seed_files: Vec<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub assets_dir: Option<PathBuf>,
    pub special_edition_modulus: usize,
    pub pricing_seed: Option<u64>,
    pub repository_timeout_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: None,
            seed_files: vec![],
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
            assets_dir: None,
            special_edition_modulus: DEFAULT_SPECIAL_EDITION_MODULUS,
            pricing_seed: None,
            repository_timeout_ms: DEFAULT_REPOSITORY_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite catalog. When absent the server serves the seed files from memory.
    pub db_path: Option<PathBuf>,
    pub seed_files: Vec<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub assets_dir: Option<PathBuf>,
    pub pricing: PricingConfig,
    pub pricing_seed: Option<u64>,
    pub repository_timeout: Duration,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file.db_path.map(PathBuf::from).or_else(|| cli.db_path.clone());
        if let Some(db_path) = &db_path {
            if db_path.is_dir() {
                bail!("db_path is a directory: {:?}", db_path);
            }
            match db_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                    bail!("Database directory does not exist: {:?}", parent)
                }
                _ => {}
            }
        }

        let seed_files: Vec<PathBuf> = match file.seed {
            Some(seed) => seed.into_iter().map(PathBuf::from).collect(),
            None => cli.seed_files.clone(),
        };
        for seed_file in &seed_files {
            if !seed_file.is_file() {
                bail!("Seed file does not exist: {:?}", seed_file);
            }
        }

        if db_path.is_none() && seed_files.is_empty() {
            bail!("A catalog source must be specified via --db, --seed or in config file");
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow!("Invalid logging_level in config file: {}", s))?,
            None => cli.logging_level.clone(),
        };

        let assets_dir = file
            .assets_dir
            .map(PathBuf::from)
            .or_else(|| cli.assets_dir.clone());
        if let Some(assets_dir) = &assets_dir {
            if !assets_dir.is_dir() {
                bail!("Assets directory does not exist: {:?}", assets_dir);
            }
        }

        let repository_timeout_ms = file
            .repository_timeout_ms
            .unwrap_or(cli.repository_timeout_ms);
        if repository_timeout_ms == 0 {
            bail!("repository_timeout_ms must be greater than 0");
        }

        let pricing_file = file.pricing.unwrap_or_default();
        let special_edition_modulus = pricing_file
            .special_edition_modulus
            .unwrap_or(cli.special_edition_modulus);
        let special_edition_modulus = NonZeroUsize::new(special_edition_modulus)
            .ok_or_else(|| anyhow!("special_edition_modulus must be at least 1"))?;
        let pricing = PricingConfig {
            special_edition_modulus,
            jitter_dollars: pricing_file.jitter_dollars.unwrap_or(DEFAULT_JITTER_DOLLARS),
        };
        let pricing_seed = pricing_file.seed.or(cli.pricing_seed);

        Ok(Self {
            db_path,
            seed_files,
            port,
            logging_level,
            assets_dir,
            pricing,
            pricing_seed,
            repository_timeout: Duration::from_millis(repository_timeout_ms),
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            assets_dir: self.assets_dir.clone(),
            pricing: self.pricing.clone(),
            pricing_seed: self.pricing_seed,
            repository_timeout: self.repository_timeout,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn db_cli(temp_dir: &TempDir) -> CliConfig {
        CliConfig {
            db_path: Some(temp_dir.path().join("catalog.db")),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("PATH"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().join("catalog.db")),
            port: 3999,
            logging_level: RequestsLoggingLevel::Headers,
            assets_dir: Some(temp_dir.path().to_path_buf()),
            special_edition_modulus: 3,
            pricing_seed: Some(9),
            repository_timeout_ms: 1200,
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, Some(temp_dir.path().join("catalog.db")));
        assert_eq!(config.port, 3999);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.assets_dir.as_deref(), Some(temp_dir.path()));
        assert_eq!(config.pricing.special_edition_modulus.get(), 3);
        assert_eq!(config.pricing.jitter_dollars, DEFAULT_JITTER_DOLLARS);
        assert_eq!(config.pricing_seed, Some(9));
        assert_eq!(config.repository_timeout, Duration::from_millis(1200));
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/should/be/overridden/catalog.db")),
            port: 3001,
            logging_level: RequestsLoggingLevel::Path,
            pricing_seed: Some(1),
            ..Default::default()
        };

        let file_config = FileConfig {
            db_path: Some(
                temp_dir
                    .path()
                    .join("toml.db")
                    .to_string_lossy()
                    .to_string(),
            ),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            pricing: Some(PricingFileConfig {
                special_edition_modulus: Some(4),
                jitter_dollars: Some(0),
                seed: None,
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        assert_eq!(config.db_path, Some(temp_dir.path().join("toml.db")));
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.pricing.special_edition_modulus.get(), 4);
        assert_eq!(config.pricing.jitter_dollars, 0);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.pricing_seed, Some(1));
        assert_eq!(
            config.repository_timeout,
            Duration::from_millis(DEFAULT_REPOSITORY_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_resolve_missing_catalog_source_error() {
        let result = AppConfig::resolve(&CliConfig::default(), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("catalog source must be specified"));
    }

    #[test]
    fn test_resolve_nonexistent_db_dir_error() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/nonexistent/path/catalog.db")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_db_path_is_directory_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("is a directory"));
    }

    #[test]
    fn test_resolve_seed_only() {
        let seed = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            seed_files: vec![seed.path().to_path_buf()],
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, None).unwrap();
        assert!(config.db_path.is_none());
        assert_eq!(config.seed_files, vec![seed.path().to_path_buf()]);
    }

    #[test]
    fn test_resolve_missing_seed_file_error() {
        let cli = CliConfig {
            seed_files: vec![PathBuf::from("/nonexistent/seed.json")],
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("Seed file"));
    }

    #[test]
    fn test_resolve_zero_modulus_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            special_edition_modulus: 0,
            ..db_cli(&temp_dir)
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("at least 1"));
    }

    #[test]
    fn test_resolve_zero_timeout_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            repository_timeout_ms: 0,
            ..db_cli(&temp_dir)
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }

    #[test]
    fn test_resolve_invalid_toml_logging_level_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_config = FileConfig {
            logging_level: Some("loud".to_string()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&db_cli(&temp_dir), Some(file_config));
        assert!(result.unwrap_err().to_string().contains("logging_level"));
    }

    #[test]
    fn test_resolve_missing_assets_dir_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            assets_dir: Some(PathBuf::from("/nonexistent/assets")),
            ..db_cli(&temp_dir)
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("Assets directory"));
    }

    #[test]
    fn test_server_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::resolve(&db_cli(&temp_dir), None).unwrap();
        let server_config = config.server_config();
        assert_eq!(server_config.port, DEFAULT_PORT);
        assert_eq!(server_config.pricing, config.pricing);
        assert_eq!(
            server_config.repository_timeout,
            Duration::from_millis(DEFAULT_REPOSITORY_TIMEOUT_MS)
        );
    }
}
