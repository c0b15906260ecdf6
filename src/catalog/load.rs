//! Seed documents loading

use super::{Artist, Genre};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Contents of one seed JSON file. Both lists are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub genres: Vec<Genre>,
    pub artists: Vec<Artist>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SeedProblem {
    DuplicateArtist(String),
    DuplicateGenre(String),
    UnknownGenre { artist_id: String, genre_link: String },
}

impl Seed {
    pub fn albums_count(&self) -> usize {
        self.artists.iter().map(|a| a.discography.len()).sum()
    }

    pub fn tracks_count(&self) -> usize {
        self.artists
            .iter()
            .flat_map(|a| a.discography.iter())
            .map(|album| album.tracks.len())
            .sum()
    }

    /// Appends `other`, keeping the first occurrence of duplicated ids.
    fn merge(&mut self, other: Seed, problems: &mut Vec<SeedProblem>) {
        let mut artist_ids: HashSet<String> =
            self.artists.iter().map(|a| a.id.to_string()).collect();
        for artist in other.artists {
            if artist_ids.insert(artist.id.to_string()) {
                self.artists.push(artist);
            } else {
                problems.push(SeedProblem::DuplicateArtist(artist.id.to_string()));
            }
        }

        let mut links: HashSet<String> = self.genres.iter().map(|g| g.link.clone()).collect();
        for genre in other.genres {
            if links.insert(genre.link.clone()) {
                self.genres.push(genre);
            } else {
                problems.push(SeedProblem::DuplicateGenre(genre.link));
            }
        }
    }

    fn check_genre_links(&self, problems: &mut Vec<SeedProblem>) {
        if self.genres.is_empty() {
            return;
        }
        let links: HashSet<&str> = self.genres.iter().map(|g| g.link.as_str()).collect();
        for artist in &self.artists {
            if let Some(link) = artist.genre_link.as_deref() {
                if !links.contains(link) {
                    problems.push(SeedProblem::UnknownGenre {
                        artist_id: artist.id.to_string(),
                        genre_link: link.to_owned(),
                    });
                }
            }
        }
    }
}

pub fn parse_seed(json: &str) -> Result<Seed> {
    serde_json::from_str(json).context("Failed to parse seed document.")
}

pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Seed> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    parse_seed(&json).with_context(|| format!("Invalid seed file {}", path.display()))
}

/// Loads and merges seed files in the given order.
///
/// Duplicates and dangling genre links are reported but not fatal.
pub fn load_seed<P: AsRef<Path>>(paths: &[P]) -> Result<Seed> {
    if paths.is_empty() {
        bail!("No seed files given");
    }

    let mut seed = Seed::default();
    let mut problems = vec![];
    for path in paths {
        let file_seed = load_seed_file(path)?;
        info!(
            "Read {} artists and {} genres from {}",
            file_seed.artists.len(),
            file_seed.genres.len(),
            path.as_ref().display()
        );
        seed.merge(file_seed, &mut problems);
    }
    seed.check_genre_links(&mut problems);

    if !problems.is_empty() {
        info!("Found {} problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
    }
    info!(
        "Seed has:\n{} genres\n{} artists\n{} albums\n{} tracks",
        seed.genres.len(),
        seed.artists.len(),
        seed.albums_count(),
        seed.tracks_count()
    );
    Ok(seed)
}
