//! Seed Import Tool
//!
//! Imports one or more JSON seed files into a SQLite catalog database,
//! creating or migrating the database as needed.

use anyhow::{Context, Result};
use clap::Parser;
use disco_catalog_server::catalog::load_seed;
use disco_catalog_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-import")]
#[command(about = "Import JSON seed files into a SQLite catalog database")]
struct Args {
    /// Path to the SQLite database file, created if missing
    #[arg(value_name = "DB")]
    db: PathBuf,

    /// Seed files, merged in order. The first occurrence of an artist or genre wins
    #[arg(value_name = "SEED", required = true)]
    seed_files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Database: {}", args.db.display());
    if args.db.exists() {
        warn!(
            "Database already exists, existing artists and genres with the same id are replaced: {}",
            args.db.display()
        );
    }

    let seed = load_seed(&args.seed_files)?;
    let store = SqliteCatalogStore::new(&args.db)
        .with_context(|| format!("Failed to open {}", args.db.display()))?;
    let summary = store.import_seed(&seed)?;

    info!("Import Summary");
    info!("==============");
    info!("Artists imported: {}", summary.artists);
    info!("Albums imported: {}", summary.albums);
    info!("Genres imported: {}", summary.genres);

    let counts = store.counts()?;
    info!("Database contains:");
    info!("  {} artists", counts.artists);
    info!("  {} albums", counts.albums);
    info!("  {} tracks", counts.tracks);
    info!("  {} genres", counts.genres);

    Ok(())
}
