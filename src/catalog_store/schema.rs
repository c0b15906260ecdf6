//! SQLite schema of the catalog database.
//!
//! Artists keep their insertion order in `position`, albums keep their
//! discography order in `(artist_id, position)`. Tracks are small and always
//! read together with their album, so they are stored as a JSON array.

use crate::sqlite_column;
use crate::sqlite_persistence::{ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema};
use anyhow::Result;
use rusqlite::Connection;

pub const ARTISTS_TABLE_NAME: &str = "artists";
pub const ALBUMS_TABLE_NAME: &str = "albums";
pub const GENRES_TABLE_NAME: &str = "genres";

const ARTISTS_TABLE_V_0: Table = Table {
    name: ARTISTS_TABLE_NAME,
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true), // 24 hex chars
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("genre_link", &SqlType::Text),
        sqlite_column!("img_url", &SqlType::Text),
        sqlite_column!("bio_summary", &SqlType::Text),
        sqlite_column!("bio_birthdate", &SqlType::Text),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[
        ("idx_artists_genre_link", "genre_link"),
        ("idx_artists_position", "position"),
    ],
    unique_constraints: &[],
};

const ALBUM_ARTIST_FOREIGN_KEY: ForeignKey = ForeignKey {
    foreign_table: ARTISTS_TABLE_NAME,
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ALBUMS_TABLE_V_0: Table = Table {
    name: ALBUMS_TABLE_NAME,
    columns: &[
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ALBUM_ARTIST_FOREIGN_KEY)
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("release_date", &SqlType::Text), // '1959-08-17', '1959-08', '1959'
        sqlite_column!("img_url", &SqlType::Text),
        sqlite_column!("explicit_id", &SqlType::Text),
        sqlite_column!(
            "tracks",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'[]'")
        ),
    ],
    indices: &[],
    unique_constraints: &[&["artist_id", "position"]],
};

const GENRES_TABLE_V_0: Table = Table {
    name: GENRES_TABLE_NAME,
    columns: &[
        sqlite_column!("link", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[],
};

/// V1 adds the genre display color.
const GENRES_TABLE_V_1: Table = Table {
    name: GENRES_TABLE_NAME,
    columns: &[
        sqlite_column!("link", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
        sqlite_column!("color", &SqlType::Text),
    ],
    indices: &[],
    unique_constraints: &[],
};

fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    conn.execute(
        &format!("ALTER TABLE {} ADD COLUMN color TEXT", GENRES_TABLE_NAME),
        [],
    )?;
    Ok(())
}

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[ARTISTS_TABLE_V_0, ALBUMS_TABLE_V_0, GENRES_TABLE_V_0],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[ARTISTS_TABLE_V_0, ALBUMS_TABLE_V_0, GENRES_TABLE_V_1],
        migration: Some(migrate_v0_to_v1),
    },
];
