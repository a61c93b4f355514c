//! SQLite schema definitions for the taxonomy database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const ARTISTS_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const GENRES_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::NoAction,
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text, non_null = true),
        sqlite_column!("pageid", &SqlType::Integer, non_null = true),
        sqlite_column!("spotify_id", &SqlType::Text),
    ],
    indices: &[("idx_artists_spotify_id", "spotify_id")],
};

/// Genre names are not unique at the database level; lookups go by exact name.
const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_genres_name", "name")],
};

/// (artist_id, genre_id) pairs are deduplicated by a pre-insert check only.
const ARTIST_GENRE_TABLE: Table = Table {
    name: "artist_genre",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTISTS_FK)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRES_FK)
        ),
        sqlite_column!(
            "category_genre_id",
            &SqlType::Integer,
            foreign_key = Some(&GENRES_FK)
        ),
    ],
    indices: &[
        ("idx_artist_genre_artist", "artist_id"),
        ("idx_artist_genre_category", "category_genre_id"),
    ],
};

const PAGE_TABLE: Table = Table {
    name: "page",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("content", &SqlType::Text, non_null = true),
        sqlite_column!("type", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTISTS_FK)
        ),
    ],
    indices: &[("idx_page_artist", "artist_id")],
};

/// Spotify accounts that completed the OAuth flow, keyed by Spotify user id.
const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("display_name", &SqlType::Text),
        sqlite_column!("email", &SqlType::Text),
        sqlite_column!("access_token", &SqlType::Text),
        sqlite_column!("refresh_token", &SqlType::Text),
    ],
    indices: &[],
};

/// Kept for file compatibility; nothing reads or writes it.
const TASK_TABLE: Table = Table {
    name: "task",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("text", &SqlType::Text, non_null = true),
        sqlite_column!("completed", &SqlType::Integer, default_value = Some("0")),
    ],
    indices: &[],
};

pub const TAXONOMY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        GENRES_TABLE,
        ARTIST_GENRE_TABLE,
        PAGE_TABLE,
        USERS_TABLE,
        TASK_TABLE,
    ],
    migration: None,
}];
