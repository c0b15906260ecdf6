use super::ArtistId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Track {
    pub title: String,
    #[serde(default)]
    pub featured_artists: Vec<String>,
}

/// One element of an artist's discography, as stored.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(from = "RawAlbumRecord")]
pub struct AlbumRecord {
    /// Rarely present. Albums are addressed by position, see [`super::identity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    pub img_url: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "RawArtist")]
pub struct Artist {
    #[serde(rename = "_id")]
    pub id: ArtistId,
    pub name: String,
    #[serde(default, rename = "genreLink")]
    pub genre_link: Option<String>,
    pub img_url: Option<String>,
    #[serde(default)]
    pub bio_summary: Option<String>,
    #[serde(default)]
    pub bio_birthdate: Option<String>,
    #[serde(default)]
    pub discography: Vec<AlbumRecord>,
}

/// Documents may carry the current `img_url`, the legacy `img`, or both.
/// A non-empty `img_url` wins.
fn resolve_image(img_url: Option<String>, img: Option<String>) -> Option<String> {
    img_url
        .filter(|s| !s.is_empty())
        .or(img.filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
struct RawAlbumRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    tracks: Vec<Track>,
    #[serde(default)]
    img_url: Option<String>,
    #[serde(default)]
    img: Option<String>,
}

impl From<RawAlbumRecord> for AlbumRecord {
    fn from(raw: RawAlbumRecord) -> Self {
        AlbumRecord {
            id: raw.id,
            title: raw.title,
            release_date: raw.release_date,
            tracks: raw.tracks,
            img_url: resolve_image(raw.img_url, raw.img),
        }
    }
}

#[derive(Deserialize)]
struct RawArtist {
    #[serde(default, rename = "_id")]
    document_id: Option<ArtistId>,
    #[serde(default)]
    id: Option<ArtistId>,
    name: String,
    #[serde(default, rename = "genreLink")]
    genre_link: Option<String>,
    #[serde(default)]
    img_url: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    bio_summary: Option<String>,
    #[serde(default)]
    bio_birthdate: Option<String>,
    #[serde(default)]
    discography: Vec<AlbumRecord>,
}

impl TryFrom<RawArtist> for Artist {
    type Error = String;

    fn try_from(raw: RawArtist) -> Result<Self, Self::Error> {
        let id = raw
            .document_id
            .or(raw.id)
            .ok_or_else(|| format!("artist {:?} has neither `_id` nor `id`", raw.name))?;
        Ok(Artist {
            id,
            name: raw.name,
            genre_link: raw.genre_link,
            img_url: resolve_image(raw.img_url, raw.img),
            bio_summary: raw.bio_summary,
            bio_birthdate: raw.bio_birthdate,
            discography: raw.discography,
        })
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Genre {
    pub link: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}
