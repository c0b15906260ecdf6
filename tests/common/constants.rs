//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the seed fixture changes, update only this file.

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Artist ID for "The Test Band", six albums
pub const ARTIST_1_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d1";

/// Artist ID for "Jazz Ensemble", one album
pub const ARTIST_2_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d2";

/// Well-formed artist ID that is not in the catalog
pub const MISSING_ARTIST_ID: &str = "64b7f0c2a1d3e4f5a6b7c8ff";

/// "First Album" by The Test Band
pub const ALBUM_1_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d1-0";

/// "Second Album" by The Test Band
pub const ALBUM_2_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d1-1";

/// "Sixth Album" by The Test Band
pub const ALBUM_6_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d1-5";

/// "Jazz Collection" by Jazz Ensemble
pub const JAZZ_ALBUM_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d2-0";

// ============================================================================
// Test Catalog Metadata
// ============================================================================

pub const ARTIST_1_NAME: &str = "The Test Band";
pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const ALBUM_1_TITLE: &str = "First Album";
pub const ALBUM_6_TITLE: &str = "Sixth Album";
pub const JAZZ_ALBUM_TITLE: &str = "Jazz Collection";

pub const ALBUM_1_TRACK_COUNT: usize = 3;

pub const GENRE_ROCK: &str = "rock";
pub const GENRE_JAZZ: &str = "jazz";

pub const TOTAL_ARTISTS: usize = 2;
pub const TOTAL_ALBUMS: usize = 7;

// ============================================================================
// Expected Prices
// ============================================================================
//
// Every fixture album is older than twenty years, so the base price is 8.99,
// and the test server runs with zero jitter.

/// 8.99 + 4.99 special + 3.00 decay + 0.30 tracks
pub const ALBUM_1_PRICE: &str = "17.28";

/// 8.99 + 2.50 decay + 0.20 tracks
pub const ALBUM_2_PRICE: &str = "11.69";

/// 8.99 + 4.99 special + 0.50 decay + 0.10 tracks
pub const ALBUM_6_PRICE: &str = "14.58";

// ============================================================================
// Test Server Configuration
// ============================================================================

/// Seed of every request's random source in the test server
pub const TEST_PRICING_SEED: u64 = 1234;

/// File served from the test assets directory
pub const ASSET_PATH: &str = "covers/first-album.jpg";

/// Content of [`ASSET_PATH`]
pub const ASSET_BYTES: &[u8] = b"not really a jpeg";

/// Timeout for waiting for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval when checking server readiness (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// HTTP request timeout for test client (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
