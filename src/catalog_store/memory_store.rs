use super::trait_def::{ArtistRepository, CatalogCounts, CatalogStore, GenreRepository};
use crate::catalog::{Artist, ArtistId, Genre, Seed};
use anyhow::Result;

/// Immutable store over documents held in memory. Used for `--seed` runs
/// without a database and in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalogStore {
    artists: Vec<Artist>,
    genres: Vec<Genre>,
}

impl InMemoryCatalogStore {
    pub fn new(artists: Vec<Artist>, genres: Vec<Genre>) -> Self {
        InMemoryCatalogStore { artists, genres }
    }
}

impl From<Seed> for InMemoryCatalogStore {
    fn from(seed: Seed) -> Self {
        InMemoryCatalogStore::new(seed.artists, seed.genres)
    }
}

impl ArtistRepository for InMemoryCatalogStore {
    fn find_all(&self) -> Result<Vec<Artist>> {
        Ok(self.artists.clone())
    }

    fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>> {
        Ok(self.artists.iter().find(|a| &a.id == id).cloned())
    }

    fn find_by_genre(&self, genre_link: &str) -> Result<Vec<Artist>> {
        Ok(self
            .artists
            .iter()
            .filter(|a| a.genre_link.as_deref() == Some(genre_link))
            .cloned()
            .collect())
    }
}

impl GenreRepository for InMemoryCatalogStore {
    fn find_all_genres(&self) -> Result<Vec<Genre>> {
        Ok(self.genres.clone())
    }

    fn find_genre(&self, link: &str) -> Result<Option<Genre>> {
        Ok(self.genres.iter().find(|g| g.link == link).cloned())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn counts(&self) -> Result<CatalogCounts> {
        let albums = self.artists.iter().flat_map(|a| a.discography.iter());
        Ok(CatalogCounts {
            artists: self.artists.len(),
            albums: albums.clone().count(),
            tracks: albums.map(|album| album.tracks.len()).sum(),
            genres: self.genres.len(),
        })
    }
}
