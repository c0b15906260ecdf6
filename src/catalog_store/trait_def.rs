//! Storage traits consumed by the catalog index and the server.
//!
//! All methods are synchronous. The server calls them from the blocking pool.

use crate::catalog::{Artist, ArtistId, Genre};
use anyhow::Result;
use serde::Serialize;

/// Read access to artists and their discographies.
///
/// `find_all` and `find_by_genre` return artists in a stable order and every
/// artist's discography in its stored order, since album identifiers are
/// positional.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ArtistRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<Artist>>;

    fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>>;

    fn find_by_genre(&self, genre_link: &str) -> Result<Vec<Artist>>;
}

pub trait GenreRepository: Send + Sync {
    fn find_all_genres(&self) -> Result<Vec<Genre>>;

    fn find_genre(&self, link: &str) -> Result<Option<Genre>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub artists: usize,
    pub albums: usize,
    pub tracks: usize,
    pub genres: usize,
}

/// Everything the server needs from a backend.
pub trait CatalogStore: ArtistRepository + GenreRepository {
    fn counts(&self) -> Result<CatalogCounts>;
}
