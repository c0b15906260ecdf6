//! Test fixture creation for the catalog database and assets

use super::constants::*;
use anyhow::Result;
use disco_catalog_server::catalog::{load_seed, parse_seed, Seed};
use disco_catalog_server::catalog_store::SqliteCatalogStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Seed catalog embedded at compile time
const TEST_SEED_JSON: &str = include_str!("../fixtures/test-seed.json");

/// The fixture seed, parsed
pub fn test_seed() -> Result<Seed> {
    parse_seed(TEST_SEED_JSON)
}

/// Creates a temporary SQLite catalog with 2 artists, 7 albums, 2 genres,
/// imported from the seed fixture through a seed file on disk, plus an
/// assets directory.
/// Returns (temp_dir, catalog_db_path, assets_path)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;

    let seed_path = dir.path().join("seed.json");
    fs::write(&seed_path, TEST_SEED_JSON)?;

    let assets_path = dir.path().join("assets");
    fs::create_dir_all(assets_path.join("covers"))?;
    fs::write(assets_path.join(ASSET_PATH), ASSET_BYTES)?;

    let catalog_db_path = dir.path().join("catalog.db");
    let store = SqliteCatalogStore::new(&catalog_db_path)?;
    store.import_seed(&load_seed(&[&seed_path])?)?;

    Ok((dir, catalog_db_path, assets_path))
}
