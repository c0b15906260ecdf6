//! Error taxonomy of the catalog core.

use super::ArtistId;
use thiserror::Error;

/// What could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("artist {0} not found")]
    Artist(ArtistId),
    #[error("album {index} not found for artist {artist_id} ({discography_len} albums)")]
    Album {
        artist_id: ArtistId,
        index: usize,
        discography_len: usize,
    },
    #[error("genre {0:?} not found")]
    Genre(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed album or artist identifier, a client input error.
    #[error("Invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier {
        identifier: String,
        reason: &'static str,
    },

    #[error("{0}")]
    NotFound(NotFound),

    /// The artist repository failed or timed out. Never retried here.
    #[error("Catalog repository unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl CatalogError {
    pub(crate) fn invalid_identifier<S: Into<String>>(identifier: S, reason: &'static str) -> Self {
        CatalogError::InvalidIdentifier {
            identifier: identifier.into(),
            reason,
        }
    }

    pub(crate) fn upstream(err: anyhow::Error) -> Self {
        CatalogError::UpstreamUnavailable(format!("{:#}", err))
    }

    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, CatalogError::InvalidIdentifier { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, CatalogError::UpstreamUnavailable(_))
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
