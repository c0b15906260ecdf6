//! Flattening artists' discographies into priced catalog entries.

use super::error::{CatalogError, CatalogResult, NotFound};
use super::identity::{self, ArtistId};
use super::{Artist, CatalogEntry, PricingEngine};
use crate::catalog_store::ArtistRepository;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    pricing: PricingEngine,
}

impl CatalogIndex {
    pub fn new(pricing: PricingEngine) -> Self {
        CatalogIndex { pricing }
    }

    /// Every album of every artist, artists in input order and albums in
    /// stored discography order. Each album is priced exactly once.
    pub fn build<R: Rng + ?Sized>(
        &self,
        artists: &[Artist],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(artists.iter().map(|a| a.discography.len()).sum());
        for artist in artists {
            self.append_artist_entries(artist, now, rng, &mut entries);
        }
        entries
    }

    pub fn build_artist<R: Rng + ?Sized>(
        &self,
        artist: &Artist,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<CatalogEntry> {
        let mut entries = Vec::with_capacity(artist.discography.len());
        self.append_artist_entries(artist, now, rng, &mut entries);
        entries
    }

    fn append_artist_entries<R: Rng + ?Sized>(
        &self,
        artist: &Artist,
        now: DateTime<Utc>,
        rng: &mut R,
        out: &mut Vec<CatalogEntry>,
    ) {
        for position in 0..artist.discography.len() {
            out.push(self.make_entry(artist, position, now, rng));
        }
    }

    fn make_entry<R: Rng + ?Sized>(
        &self,
        artist: &Artist,
        position: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CatalogEntry {
        let album = &artist.discography[position];
        let pricing = self
            .pricing
            .compute(album, i64::try_from(position).unwrap_or(i64::MAX), now, rng);
        CatalogEntry::new(artist, position, album, pricing)
    }

    /// Fetches all artists and flattens them.
    pub fn list<A: ArtistRepository + ?Sized, R: Rng + ?Sized>(
        &self,
        repository: &A,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CatalogResult<Vec<CatalogEntry>> {
        let artists = repository.find_all().map_err(|err| {
            warn!("Failed to fetch artists: {:#}", err);
            CatalogError::upstream(err)
        })?;
        Ok(self.build(&artists, now, rng))
    }

    /// Flattens the artists of one genre.
    pub fn list_for_genre<A: ArtistRepository + ?Sized, R: Rng + ?Sized>(
        &self,
        genre_link: &str,
        repository: &A,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CatalogResult<Vec<CatalogEntry>> {
        let artists = repository.find_by_genre(genre_link).map_err(|err| {
            warn!("Failed to fetch artists of genre {}: {:#}", genre_link, err);
            CatalogError::upstream(err)
        })?;
        Ok(self.build(&artists, now, rng))
    }

    /// The entries of one artist's discography.
    pub fn list_for_artist<A: ArtistRepository + ?Sized, R: Rng + ?Sized>(
        &self,
        artist_id: &str,
        repository: &A,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CatalogResult<Vec<CatalogEntry>> {
        let artist_id = ArtistId::parse(artist_id)?;
        let artist = fetch_artist(&artist_id, repository)?;
        Ok(self.build_artist(&artist, now, rng))
    }

    /// Resolves a composite identifier with a single-artist fetch.
    ///
    /// The identifier is positional: it resolves to whatever album sits at
    /// that index of the artist's discography now.
    pub fn lookup<A: ArtistRepository + ?Sized, R: Rng + ?Sized>(
        &self,
        identifier: &str,
        repository: &A,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> CatalogResult<CatalogEntry> {
        let (artist_id, index) = identity::decode(identifier)?;
        let artist = fetch_artist(&artist_id, repository)?;

        if index >= artist.discography.len() {
            debug!(
                "Album index {} out of bounds for artist {} ({} albums)",
                index,
                artist_id,
                artist.discography.len()
            );
            return Err(CatalogError::NotFound(NotFound::Album {
                artist_id,
                index,
                discography_len: artist.discography.len(),
            }));
        }

        Ok(self.make_entry(&artist, index, now, rng))
    }
}

fn fetch_artist<A: ArtistRepository + ?Sized>(
    artist_id: &ArtistId,
    repository: &A,
) -> CatalogResult<Artist> {
    match repository.find_by_id(artist_id) {
        Ok(Some(artist)) => Ok(artist),
        Ok(None) => {
            debug!("Artist {} not found", artist_id);
            Err(CatalogError::NotFound(NotFound::Artist(artist_id.clone())))
        }
        Err(err) => {
            warn!("Failed to fetch artist {}: {:#}", artist_id, err);
            Err(CatalogError::upstream(err))
        }
    }
}
