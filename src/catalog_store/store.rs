//! SQLite-backed catalog store.

use super::schema::{CATALOG_VERSIONED_SCHEMAS, GENRES_TABLE_NAME};
use super::trait_def::{ArtistRepository, CatalogCounts, CatalogStore, GenreRepository};
use crate::catalog::{AlbumRecord, Artist, ArtistId, Genre, Seed, Track};
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

const ARTIST_COLUMNS: &str = "id, name, genre_link, img_url, bio_summary, bio_birthdate";
const ALBUM_COLUMNS: &str = "artist_id, title, release_date, img_url, explicit_id, tracks";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub artists: usize,
    pub albums: usize,
    pub genres: usize,
}

fn create_or_migrate(conn: &Connection) -> Result<()> {
    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        let latest = CATALOG_VERSIONED_SCHEMAS.len() - 1;
        info!("Creating catalog db schema at version {}", latest);
        return CATALOG_VERSIONED_SCHEMAS[latest].create(conn);
    }

    migrate_if_needed(conn, CATALOG_VERSIONED_SCHEMAS)?;
    Ok(())
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {}", db_path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Per connection, needed for cascading album deletes.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        create_or_migrate(&conn)?;

        let store = SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        };
        let counts = store.counts()?;
        info!(
            "Opened catalog: {} artists, {} albums, {} tracks, {} genres",
            counts.artists, counts.albums, counts.tracks, counts.genres
        );
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Catalog database connection poisoned"))
    }

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        let id: String = row.get(0)?;
        let id = ArtistId::parse(&id).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
        })?;
        Ok(Artist {
            id,
            name: row.get(1)?,
            genre_link: row.get(2)?,
            img_url: row.get(3)?,
            bio_summary: row.get(4)?,
            bio_birthdate: row.get(5)?,
            discography: vec![],
        })
    }

    /// Returns `(artist_id, album)`.
    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<(String, AlbumRecord)> {
        let tracks_json: String = row.get(5)?;
        let tracks: Vec<Track> = serde_json::from_str(&tracks_json).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(err))
        })?;
        Ok((
            row.get(0)?,
            AlbumRecord {
                title: row.get(1)?,
                release_date: row.get(2)?,
                img_url: row.get(3)?,
                id: row.get(4)?,
                tracks,
            },
        ))
    }

    fn query_artists(
        conn: &Connection,
        where_clause: &str,
        param: Option<&str>,
    ) -> Result<Vec<Artist>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM artists {} ORDER BY position",
            ARTIST_COLUMNS, where_clause
        ))?;
        let mut artists = match param {
            Some(param) => stmt
                .query_map(params![param], Self::parse_artist_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::parse_artist_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Self::attach_discographies(conn, &mut artists)?;
        Ok(artists)
    }

    fn attach_discographies(conn: &Connection, artists: &mut [Artist]) -> Result<()> {
        if artists.is_empty() {
            return Ok(());
        }
        let mut by_artist: HashMap<String, Vec<AlbumRecord>> = HashMap::new();
        if let [artist] = &*artists {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM albums WHERE artist_id = ?1 ORDER BY position",
                ALBUM_COLUMNS
            ))?;
            for row in stmt.query_map(params![artist.id.as_str()], Self::parse_album_row)? {
                let (artist_id, album) = row?;
                by_artist.entry(artist_id).or_default().push(album);
            }
        } else {
            let mut stmt = conn.prepare_cached(&format!(
                "SELECT {} FROM albums ORDER BY artist_id, position",
                ALBUM_COLUMNS
            ))?;
            for row in stmt.query_map([], Self::parse_album_row)? {
                let (artist_id, album) = row?;
                by_artist.entry(artist_id).or_default().push(album);
            }
        }
        for artist in artists.iter_mut() {
            artist.discography = by_artist.remove(artist.id.as_str()).unwrap_or_default();
        }
        Ok(())
    }

    fn parse_genre_row(row: &rusqlite::Row) -> rusqlite::Result<Genre> {
        Ok(Genre {
            link: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
        })
    }

    /// Inserts or replaces an artist with its whole discography.
    ///
    /// A replaced artist keeps its position, a new one goes last.
    fn upsert_artist(tx: &Transaction, artist: &Artist) -> Result<usize> {
        tx.execute(
            "INSERT INTO artists (id, name, genre_link, img_url, bio_summary, bio_birthdate, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, (SELECT COALESCE(MAX(position) + 1, 0) FROM artists))
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                genre_link = excluded.genre_link,
                img_url = excluded.img_url,
                bio_summary = excluded.bio_summary,
                bio_birthdate = excluded.bio_birthdate",
            params![
                artist.id.as_str(),
                artist.name,
                artist.genre_link,
                artist.img_url,
                artist.bio_summary,
                artist.bio_birthdate,
            ],
        )
        .with_context(|| format!("Failed to insert artist {}", artist.id))?;

        tx.execute(
            "DELETE FROM albums WHERE artist_id = ?1",
            params![artist.id.as_str()],
        )?;
        let mut stmt = tx.prepare_cached(
            "INSERT INTO albums (artist_id, position, title, release_date, img_url, explicit_id, tracks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, album) in artist.discography.iter().enumerate() {
            let tracks = serde_json::to_string(&album.tracks)?;
            stmt.execute(params![
                artist.id.as_str(),
                position as i64,
                album.title,
                album.release_date,
                album.img_url,
                album.id,
                tracks,
            ])
            .with_context(|| {
                format!(
                    "Failed to insert album {} of artist {}",
                    position, artist.id
                )
            })?;
        }
        Ok(artist.discography.len())
    }

    fn upsert_genre(tx: &Transaction, genre: &Genre) -> Result<()> {
        tx.execute(
            &format!(
                "INSERT INTO {table} (link, name, description, color, position)
                 VALUES (?1, ?2, ?3, ?4, (SELECT COALESCE(MAX(position) + 1, 0) FROM {table}))
                 ON CONFLICT(link) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    color = excluded.color",
                table = GENRES_TABLE_NAME
            ),
            params![genre.link, genre.name, genre.description, genre.color],
        )
        .with_context(|| format!("Failed to insert genre {}", genre.link))?;
        Ok(())
    }

    #[cfg(test)]
    fn insert_artist(&self, artist: &Artist) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::upsert_artist(&tx, artist)?;
        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    fn insert_genre(&self, genre: &Genre) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::upsert_genre(&tx, genre)?;
        tx.commit()?;
        Ok(())
    }

    /// Writes a whole seed in one transaction.
    pub fn import_seed(&self, seed: &Seed) -> Result<ImportSummary> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();
        for genre in &seed.genres {
            Self::upsert_genre(&tx, genre)?;
            summary.genres += 1;
        }
        for artist in &seed.artists {
            summary.albums += Self::upsert_artist(&tx, artist)?;
            summary.artists += 1;
        }
        tx.commit().context("Failed to commit seed import")?;
        info!(
            "Imported {} genres, {} artists, {} albums",
            summary.genres, summary.artists, summary.albums
        );
        Ok(summary)
    }

    #[cfg(test)]
    fn delete_artist(&self, id: &ArtistId) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM artists WHERE id = ?1", params![id.as_str()])?;
        Ok(deleted > 0)
    }
}

impl ArtistRepository for SqliteCatalogStore {
    fn find_all(&self) -> Result<Vec<Artist>> {
        let conn = self.lock()?;
        Self::query_artists(&conn, "", None)
    }

    fn find_by_id(&self, id: &ArtistId) -> Result<Option<Artist>> {
        let conn = self.lock()?;
        let artist = conn
            .prepare_cached(&format!(
                "SELECT {} FROM artists WHERE id = ?1",
                ARTIST_COLUMNS
            ))?
            .query_row(params![id.as_str()], Self::parse_artist_row)
            .optional()?;
        let Some(artist) = artist else {
            return Ok(None);
        };
        let mut artists = [artist];
        Self::attach_discographies(&conn, &mut artists)?;
        let [artist] = artists;
        Ok(Some(artist))
    }

    fn find_by_genre(&self, genre_link: &str) -> Result<Vec<Artist>> {
        let conn = self.lock()?;
        Self::query_artists(&conn, "WHERE genre_link = ?1", Some(genre_link))
    }
}

impl GenreRepository for SqliteCatalogStore {
    fn find_all_genres(&self) -> Result<Vec<Genre>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT link, name, description, color FROM {} ORDER BY position",
            GENRES_TABLE_NAME
        ))?;
        let genres = stmt
            .query_map([], Self::parse_genre_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn find_genre(&self, link: &str) -> Result<Option<Genre>> {
        let conn = self.lock()?;
        let genre = conn
            .prepare_cached(&format!(
                "SELECT link, name, description, color FROM {} WHERE link = ?1",
                GENRES_TABLE_NAME
            ))?
            .query_row(params![link], Self::parse_genre_row)
            .optional()?;
        Ok(genre)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn counts(&self) -> Result<CatalogCounts> {
        let conn = self.lock()?;
        let count = |sql: &str| -> Result<usize> {
            let value: i64 = conn.query_row(sql, [], |r| r.get(0))?;
            Ok(value as usize)
        };
        Ok(CatalogCounts {
            artists: count("SELECT COUNT(*) FROM artists")?,
            albums: count("SELECT COUNT(*) FROM albums")?,
            tracks: count("SELECT COALESCE(SUM(json_array_length(tracks)), 0) FROM albums")?,
            genres: count("SELECT COUNT(*) FROM genres")?,
        })
    }
}
