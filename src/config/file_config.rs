use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub seed: Option<Vec<String>>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub assets_dir: Option<String>,
    pub repository_timeout_ms: Option<u64>,

    pub pricing: Option<PricingFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PricingFileConfig {
    pub special_edition_modulus: Option<usize>,
    pub jitter_dollars: Option<u32>,
    /// Fixed seed for the per-request random source, for reproducible prices.
    pub seed: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_file() {
        let toml = r#"
            db_path = "/data/catalog.db"
            seed = ["jazz.json", "rock.json"]
            port = 4000
            logging_level = "headers"
            assets_dir = "/data/assets"
            repository_timeout_ms = 2500

            [pricing]
            special_edition_modulus = 7
            jitter_dollars = 0
            seed = 42
        "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.db_path.as_deref(), Some("/data/catalog.db"));
        assert_eq!(config.seed.unwrap().len(), 2);
        assert_eq!(config.port, Some(4000));
        assert_eq!(config.repository_timeout_ms, Some(2500));
        let pricing = config.pricing.unwrap();
        assert_eq!(pricing.special_edition_modulus, Some(7));
        assert_eq!(pricing.jitter_dollars, Some(0));
        assert_eq!(pricing.seed, Some(42));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.db_path.is_none());
        assert!(config.pricing.is_none());
    }

    #[test]
    fn load_reports_bad_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"port = \"not a number\"").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));

        assert!(FileConfig::load(Path::new("/nonexistent/config.toml")).is_err());
    }
}
