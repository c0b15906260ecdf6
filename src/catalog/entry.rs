use super::{AlbumId, AlbumRecord, Artist, ArtistId, Price, Pricing, Track};
use serde::{Serialize, Serializer};
use std::fmt::Display;

fn serialize_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// One purchasable album with its price, derived on each read.
///
/// The price is computed once when the entry is built and never again, so
/// every read of the same entry sees the same value. Serializes as the list
/// view (full track list); see [`CatalogEntry::summary`] and
/// [`CatalogEntry::detail`] for the other shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    #[serde(serialize_with = "serialize_display")]
    id: AlbumId,
    title: String,
    #[serde(rename = "artistId")]
    artist_id: ArtistId,
    #[serde(rename = "artistName")]
    artist_name: String,
    release_date: Option<String>,
    tracks: Vec<Track>,
    img_url: Option<String>,
    price: Price,
    #[serde(rename = "isSpecialEdition")]
    is_special_edition: bool,
}

impl CatalogEntry {
    pub(crate) fn new(
        artist: &Artist,
        position: usize,
        album: &AlbumRecord,
        pricing: Pricing,
    ) -> Self {
        CatalogEntry {
            id: AlbumId::new(artist.id.clone(), position),
            title: album.title.clone(),
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            release_date: album.release_date.clone(),
            tracks: album.tracks.clone(),
            img_url: album.img_url.clone(),
            price: pricing.price,
            is_special_edition: pricing.is_special_edition,
        }
    }

    pub fn id(&self) -> &AlbumId {
        &self.id
    }

    /// Position of the album within its artist's discography.
    pub fn position(&self) -> usize {
        self.id.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist_id(&self) -> &ArtistId {
        &self.artist_id
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn release_date(&self) -> Option<&str> {
        self.release_date.as_deref()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn img_url(&self) -> Option<&str> {
        self.img_url.as_deref()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn is_special_edition(&self) -> bool {
        self.is_special_edition
    }

    pub fn summary(&self) -> CatalogEntrySummary<'_> {
        CatalogEntrySummary {
            id: &self.id,
            title: &self.title,
            artist_id: &self.artist_id,
            artist_name: &self.artist_name,
            release_date: self.release_date(),
            track_count: self.track_count(),
            img_url: self.img_url(),
            price: self.price,
            is_special_edition: self.is_special_edition,
        }
    }

    pub fn detail(&self) -> CatalogEntryDetail<'_> {
        CatalogEntryDetail {
            entry: self,
            track_count: self.track_count(),
        }
    }
}

/// Wire shape carrying `trackCount` instead of the tracks.
#[derive(Serialize, Debug)]
pub struct CatalogEntrySummary<'a> {
    #[serde(serialize_with = "serialize_display")]
    id: &'a AlbumId,
    title: &'a str,
    #[serde(rename = "artistId")]
    artist_id: &'a ArtistId,
    #[serde(rename = "artistName")]
    artist_name: &'a str,
    release_date: Option<&'a str>,
    #[serde(rename = "trackCount")]
    track_count: usize,
    img_url: Option<&'a str>,
    price: Price,
    #[serde(rename = "isSpecialEdition")]
    is_special_edition: bool,
}

/// Wire shape carrying both the tracks and `trackCount`.
#[derive(Serialize, Debug)]
pub struct CatalogEntryDetail<'a> {
    #[serde(flatten)]
    entry: &'a CatalogEntry,
    #[serde(rename = "trackCount")]
    track_count: usize,
}
