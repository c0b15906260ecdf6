//! Composite album identifiers.
//!
//! Albums carry no identifier of their own, so they are addressed as
//! `"{artist_id}-{index}"`, where `index` is the zero-based position of the
//! album within the artist's discography at lookup time. Artist ids have a
//! fixed width, decoding splits on that boundary instead of searching for the
//! separator.

use super::error::{CatalogError, CatalogResult};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ARTIST_ID_LEN: usize = 24;
pub const SEPARATOR: char = '-';

lazy_static! {
    static ref ARTIST_ID_REGEX: Regex =
        Regex::new("^[0-9a-fA-F]{24}$").expect("Invalid artist id regex");
}

/// Artist identifier: 24 hexadecimal characters, stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtistId(String);

impl ArtistId {
    pub fn parse(s: &str) -> CatalogResult<Self> {
        if !ARTIST_ID_REGEX.is_match(s) {
            return Err(CatalogError::invalid_identifier(
                s,
                "artist id must be 24 hexadecimal characters",
            ));
        }
        Ok(ArtistId(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ArtistId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtistId::parse(s)
    }
}

impl TryFrom<String> for ArtistId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ArtistId::parse(&value)
    }
}

impl From<ArtistId> for String {
    fn from(value: ArtistId) -> Self {
        value.0
    }
}

/// Decoded form of a composite album identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AlbumId {
    pub artist_id: ArtistId,
    pub index: usize,
}

impl AlbumId {
    pub fn new(artist_id: ArtistId, index: usize) -> Self {
        AlbumId { artist_id, index }
    }

    pub fn encode(&self) -> String {
        encode(&self.artist_id, self.index)
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.artist_id, SEPARATOR, self.index)
    }
}

impl FromStr for AlbumId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(|(artist_id, index)| AlbumId { artist_id, index })
    }
}

pub fn encode(artist_id: &ArtistId, index: usize) -> String {
    format!("{}{}{}", artist_id, SEPARATOR, index)
}

pub fn decode(identifier: &str) -> CatalogResult<(ArtistId, usize)> {
    let invalid = |reason| CatalogError::invalid_identifier(identifier, reason);

    // `get` also rejects a prefix that would end inside a multi-byte char.
    let (prefix, rest) = match (
        identifier.get(..ARTIST_ID_LEN),
        identifier.get(ARTIST_ID_LEN..),
    ) {
        (Some(prefix), Some(rest)) => (prefix, rest),
        _ => return Err(invalid("too short for an artist id prefix")),
    };
    let artist_id = ArtistId::parse(prefix)
        .map_err(|_| invalid("prefix is not a valid artist id"))?;

    let suffix = rest
        .strip_prefix(SEPARATOR)
        .ok_or_else(|| invalid("missing separator after artist id"))?;
    if suffix.is_empty() {
        return Err(invalid("missing album index"));
    }
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("album index is not a non-negative integer"));
    }
    if suffix.len() > 1 && suffix.starts_with('0') {
        return Err(invalid("album index has leading zeros"));
    }
    let index = suffix
        .parse::<usize>()
        .map_err(|_| invalid("album index out of range"))?;

    Ok((artist_id, index))
}
