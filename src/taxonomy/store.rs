//! SQLite implementation of TaxonomyStore.

use super::models::{
    AddGenreOutcome, Artist, ArtistGenre, ArtistWithGenres, CategorizedGenre, CategoryArtist,
    CategoryGenre, Genre, GenreEntry, GenreKind, GenreTag, Page, PageType, TaxonomyStats,
};
use super::schema::TAXONOMY_VERSIONED_SCHEMAS;
use super::trait_def::TaxonomyStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const ARTIST_COLUMNS: &str = "a.id, a.title, a.location, a.pageid, a.spotify_id";

fn artist_from_row(row: &Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        title: row.get(1)?,
        location: row.get(2)?,
        page_id: row.get(3)?,
        spotify_id: row.get(4)?,
    })
}

fn artist_genre_from_row(row: &Row) -> rusqlite::Result<ArtistGenre> {
    Ok(ArtistGenre {
        id: row.get(0)?,
        artist_id: row.get(1)?,
        genre_id: row.get(2)?,
        category_genre_id: row.get(3)?,
    })
}

fn find_genre_id(conn: &Connection, name: &str) -> Result<Option<i64>> {
    let id = conn
        .prepare_cached("SELECT id FROM genres WHERE name = ?1 ORDER BY id LIMIT 1")?
        .query_row(params![name], |row| row.get(0))
        .optional()?;
    Ok(id)
}

fn find_or_create_genre(conn: &Connection, name: &str) -> Result<(i64, bool)> {
    if let Some(id) = find_genre_id(conn, name)? {
        return Ok((id, false));
    }
    conn.execute("INSERT INTO genres (name) VALUES (?1)", params![name])
        .with_context(|| format!("Failed to insert genre {:?}", name))?;
    let id = conn.last_insert_rowid();
    debug!("Created genre {:?} with id {}", name, id);
    Ok((id, true))
}

pub struct SqliteTaxonomyStore {
    pub(crate) read_conn: Arc<Mutex<Connection>>,
    pub(crate) write_conn: Arc<Mutex<Connection>>,
}

impl SqliteTaxonomyStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open taxonomy database")?;

        migrate_if_needed(&mut write_conn, TAXONOMY_VERSIONED_SCHEMAS, "taxonomy")?;

        write_conn
            .pragma_update(None, "journal_mode", "WAL")
            .context("Failed to set WAL mode on taxonomy write connection")?;
        write_conn
            .pragma_update(None, "foreign_keys", "ON")
            .context("Failed to enable foreign keys on taxonomy write connection")?;

        let read_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open taxonomy database for reading")?;

        let store = Self {
            read_conn: Arc::new(Mutex::new(read_conn)),
            write_conn: Arc::new(Mutex::new(write_conn)),
        };

        let stats = store.get_stats()?;
        info!(
            "Taxonomy store ready: {} artists, {} genres, {} artist genres, {} pages",
            stats.artists, stats.genres, stats.artist_genres, stats.pages
        );

        Ok(store)
    }
}

impl TaxonomyStore for SqliteTaxonomyStore {
    fn create_artist(&self, title: &str, location: &str, page_id: i64) -> Result<Artist> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO artists (title, location, pageid) VALUES (?1, ?2, ?3)",
            params![title, location, page_id],
        )?;
        Ok(Artist {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            location: location.to_string(),
            page_id,
            spotify_id: None,
        })
    }

    fn get_artist(&self, id: i64) -> Result<Option<Artist>> {
        let conn = self.read_conn.lock().unwrap();
        let artist = conn
            .prepare_cached(&format!(
                "SELECT {} FROM artists a WHERE a.id = ?1",
                ARTIST_COLUMNS
            ))?
            .query_row(params![id], artist_from_row)
            .optional()?;
        Ok(artist)
    }

    fn list_artists_with_genres(&self) -> Result<Vec<ArtistWithGenres>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT a.id, a.title, g.name, cg.name
             FROM artists a
             LEFT JOIN artist_genre ag ON ag.artist_id = a.id
             LEFT JOIN genres g ON g.id = ag.genre_id
             LEFT JOIN genres cg ON cg.id = ag.category_genre_id
             ORDER BY a.id, ag.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut artists: Vec<ArtistWithGenres> = Vec::new();
        for (id, name, genre_name, category_name) in rows {
            if artists.last().map(|a| a.id) != Some(id) {
                artists.push(ArtistWithGenres {
                    id,
                    name,
                    genres: Vec::new(),
                });
            }
            if let (Some(genre_name), Some(current)) = (genre_name, artists.last_mut()) {
                current.genres.push(GenreTag {
                    name: genre_name,
                    category: category_name,
                });
            }
        }
        Ok(artists)
    }

    fn get_artists_missing_spotify_id(&self, limit: usize) -> Result<Vec<Artist>> {
        let conn = self.read_conn.lock().unwrap();
        let artists = conn
            .prepare_cached(&format!(
                "SELECT {} FROM artists a WHERE a.spotify_id IS NULL ORDER BY a.id LIMIT ?1",
                ARTIST_COLUMNS
            ))?
            .query_map(params![limit as i64], artist_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(artists)
    }

    fn set_artist_spotify_id(&self, artist_id: i64, spotify_id: &str) -> Result<()> {
        let conn = self.write_conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE artists SET spotify_id = ?1 WHERE id = ?2",
            params![spotify_id, artist_id],
        )?;
        if updated == 0 {
            bail!("Artist {} not found", artist_id);
        }
        Ok(())
    }

    fn get_random_artist_in_category(
        &self,
        category: &str,
        require_spotify_id: bool,
    ) -> Result<Option<Artist>> {
        let conn = self.read_conn.lock().unwrap();
        let artist = conn
            .prepare_cached(&format!(
                "SELECT {} FROM artists a
                 INNER JOIN artist_genre ag ON ag.artist_id = a.id
                 INNER JOIN genres cg ON cg.id = ag.category_genre_id
                 WHERE cg.name = ?1 AND (?2 = 0 OR a.spotify_id IS NOT NULL)
                 ORDER BY RANDOM() LIMIT 1",
                ARTIST_COLUMNS
            ))?
            .query_row(params![category, require_spotify_id], artist_from_row)
            .optional()?;
        Ok(artist)
    }

    fn get_artists_in_category(&self, category: &str) -> Result<Vec<CategoryArtist>> {
        let conn = self.read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {}, g.id, g.name, ag.category_genre_id, cg.name
             FROM artists a
             INNER JOIN artist_genre ag ON ag.artist_id = a.id
             INNER JOIN genres g ON g.id = ag.genre_id
             INNER JOIN genres cg ON cg.id = ag.category_genre_id
             WHERE cg.name = ?1
             ORDER BY a.title, a.id, ag.id",
            ARTIST_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![category], |row| {
                Ok((
                    artist_from_row(row)?,
                    CategorizedGenre {
                        id: row.get(5)?,
                        name: row.get(6)?,
                        category_genre_id: row.get(7)?,
                        category_genre_name: row.get(8)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut artists: Vec<CategoryArtist> = Vec::new();
        for (artist, genre) in rows {
            match artists.last_mut() {
                Some(current) if current.id == artist.id => current.genres.push(genre),
                _ => artists.push(CategoryArtist {
                    id: artist.id,
                    title: artist.title,
                    location: artist.location,
                    page_id: artist.page_id,
                    spotify_id: artist.spotify_id,
                    genres: vec![genre],
                }),
            }
        }
        Ok(artists)
    }

    fn get_genre(&self, id: i64) -> Result<Option<Genre>> {
        let conn = self.read_conn.lock().unwrap();
        let genre = conn
            .prepare_cached("SELECT id, name FROM genres WHERE id = ?1")?
            .query_row(params![id], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(genre)
    }

    fn find_genre_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let conn = self.read_conn.lock().unwrap();
        Ok(find_genre_id(&conn, name)?.map(|id| Genre {
            id,
            name: name.to_string(),
        }))
    }

    fn list_genres(&self) -> Result<Vec<GenreEntry>> {
        let conn = self.read_conn.lock().unwrap();
        let genres = conn
            .prepare_cached(
                "SELECT g.id, g.name,
                        EXISTS(SELECT 1 FROM artist_genre ag WHERE ag.category_genre_id = g.id)
                 FROM genres g ORDER BY g.id",
            )?
            .query_map([], |row| {
                let is_category: bool = row.get(2)?;
                Ok(GenreEntry {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: if is_category {
                        GenreKind::Category
                    } else {
                        GenreKind::Raw
                    },
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(genres)
    }

    fn add_genre_to_artist(&self, artist_id: i64, genre_name: &str) -> Result<AddGenreOutcome> {
        let conn = self.write_conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        let (genre_id, genre_created) = find_or_create_genre(&tx, genre_name)?;

        let exists = tx
            .prepare_cached("SELECT 1 FROM artist_genre WHERE artist_id = ?1 AND genre_id = ?2")?
            .exists(params![artist_id, genre_id])?;
        if !exists {
            tx.execute(
                "INSERT INTO artist_genre (artist_id, genre_id) VALUES (?1, ?2)",
                params![artist_id, genre_id],
            )
            .with_context(|| {
                format!(
                    "Failed to associate genre {} with artist {}",
                    genre_id, artist_id
                )
            })?;
        }
        tx.commit()?;

        Ok(AddGenreOutcome {
            genre_id,
            genre_created,
            association_created: !exists,
        })
    }

    fn get_unmapped_artist_genres(&self, limit: usize) -> Result<Vec<ArtistGenre>> {
        let conn = self.read_conn.lock().unwrap();
        let rows = conn
            .prepare_cached(
                "SELECT id, artist_id, genre_id, category_genre_id FROM artist_genre
                 WHERE category_genre_id IS NULL ORDER BY id LIMIT ?1",
            )?
            .query_map(params![limit as i64], artist_genre_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_artist_genre(&self, id: i64) -> Result<Option<ArtistGenre>> {
        let conn = self.read_conn.lock().unwrap();
        let row = conn
            .prepare_cached(
                "SELECT id, artist_id, genre_id, category_genre_id FROM artist_genre WHERE id = ?1",
            )?
            .query_row(params![id], artist_genre_from_row)
            .optional()?;
        Ok(row)
    }

    fn set_artist_genre_category(
        &self,
        artist_genre_id: i64,
        category: CategoryGenre,
    ) -> Result<Option<i64>> {
        let conn = self.write_conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        let current: Option<Option<i64>> = tx
            .query_row(
                "SELECT category_genre_id FROM artist_genre WHERE id = ?1",
                params![artist_genre_id],
                |row| row.get(0),
            )
            .optional()?;
        match current {
            None => bail!("Artist genre {} not found", artist_genre_id),
            Some(Some(existing)) => {
                debug!(
                    "Artist genre {} already mapped to {}",
                    artist_genre_id, existing
                );
                return Ok(None);
            }
            Some(None) => {}
        }

        let (category_genre_id, _) = find_or_create_genre(&tx, category.as_str())?;
        let updated = tx.execute(
            "UPDATE artist_genre SET category_genre_id = ?1
             WHERE id = ?2 AND category_genre_id IS NULL",
            params![category_genre_id, artist_genre_id],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        tx.commit()?;
        Ok(Some(category_genre_id))
    }

    fn list_category_genres(&self) -> Result<Vec<Genre>> {
        let conn = self.read_conn.lock().unwrap();
        let mut genres = conn
            .prepare_cached(
                "SELECT g.id, g.name FROM genres g
                 WHERE EXISTS(SELECT 1 FROM artist_genre ag WHERE ag.category_genre_id = g.id)
                 ORDER BY g.name, g.id",
            )?
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        genres.dedup_by(|next, kept| next.name == kept.name);
        Ok(genres)
    }

    fn create_page(&self, artist_id: i64, page_type: PageType, content: &str) -> Result<Page> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute(
            "INSERT INTO page (content, type, artist_id) VALUES (?1, ?2, ?3)",
            params![content, page_type.as_str(), artist_id],
        )
        .with_context(|| format!("Failed to store page for artist {}", artist_id))?;
        Ok(Page {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            page_type,
            artist_id,
        })
    }

    fn get_pages_for_artist(&self, artist_id: i64) -> Result<Vec<Page>> {
        let conn = self.read_conn.lock().unwrap();
        let rows = conn
            .prepare_cached(
                "SELECT id, content, type, artist_id FROM page WHERE artist_id = ?1 ORDER BY id",
            )?
            .query_map(params![artist_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, content, page_type, artist_id)| {
                let page_type = PageType::parse(&page_type)
                    .with_context(|| format!("Unknown page type {:?} on page {}", page_type, id))?;
                Ok(Page {
                    id,
                    content,
                    page_type,
                    artist_id,
                })
            })
            .collect()
    }

    fn get_stats(&self) -> Result<TaxonomyStats> {
        let conn = self.read_conn.lock().unwrap();
        let count = |table: &str| -> Result<usize> {
            let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                r.get(0)
            })?;
            Ok(n as usize)
        };
        Ok(TaxonomyStats {
            artists: count("artists")?,
            genres: count("genres")?,
            artist_genres: count("artist_genre")?,
            pages: count("page")?,
        })
    }
}
