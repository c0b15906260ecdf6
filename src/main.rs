use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use disco_catalog_server::catalog::load_seed;
use disco_catalog_server::catalog::pricing::DEFAULT_SPECIAL_EDITION_MODULUS;
use disco_catalog_server::catalog_store::{InMemoryCatalogStore, SqliteCatalogStore};
use disco_catalog_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_PORT, DEFAULT_REPOSITORY_TIMEOUT_MS,
};
use disco_catalog_server::server::state::GuardedCatalogStore;
use disco_catalog_server::{run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// JSON seed files, one or more per flag, and the flag is repeatable.
    /// Imported into the database when --db is given, served from memory
    /// otherwise.
    #[clap(long = "seed", num_args = 1.., value_parser = parse_path)]
    pub seed_files: Vec<PathBuf>,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory to be statically served under /assets.
    #[clap(long, value_parser = parse_path)]
    pub assets_dir: Option<PathBuf>,

    /// Every album whose position in its artist's discography is a multiple
    /// of this value is a special edition.
    #[clap(long, default_value_t = DEFAULT_SPECIAL_EDITION_MODULUS)]
    pub special_edition_modulus: usize,

    /// Seeds the price jitter, making prices reproducible across requests.
    #[clap(long)]
    pub pricing_seed: Option<u64>,

    /// Upper bound for a single repository call, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_REPOSITORY_TIMEOUT_MS)]
    pub repository_timeout_ms: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db.clone(),
            seed_files: self.seed_files.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            assets_dir: self.assets_dir.clone(),
            special_edition_modulus: self.special_edition_modulus,
            pricing_seed: self.pricing_seed,
            repository_timeout_ms: self.repository_timeout_ms,
        }
    }
}

fn open_catalog_store(config: &AppConfig) -> Result<GuardedCatalogStore> {
    match &config.db_path {
        Some(db_path) => {
            info!("Opening SQLite catalog database at {:?}...", db_path);
            let store = SqliteCatalogStore::new(db_path)?;
            if !config.seed_files.is_empty() {
                let seed = load_seed(&config.seed_files)?;
                let summary = store
                    .import_seed(&seed)
                    .context("Failed to import seed files")?;
                info!(
                    "Imported {} artists, {} albums, {} genres",
                    summary.artists, summary.albums, summary.genres
                );
            }
            Ok(Arc::new(store))
        }
        None => {
            info!("Serving seed files from memory");
            let seed = load_seed(&config.seed_files)?;
            Ok(Arc::new(InMemoryCatalogStore::from(seed)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let catalog_store = open_catalog_store(&app_config)?;

    info!("Ready to serve at port {}!", app_config.port);
    run_server(catalog_store, app_config.server_config()).await
}
