//! Song rows.
//!
//! Every song references exactly one file through `song_file_id`. The reference is checked
//! before any write, and the foreign key backs that check up inside SQLite. Reads join the
//! file in so callers always receive a fully resolved [`Song`].

use crate::db::Database;
use crate::models::{File, Song};
use crate::repositories::files::find_file;
use crate::{CoreError, CoreResult};
use rusqlite::{params, Connection, OptionalExtension};

const SELECT_SONGS: &str = "
    SELECT songs.id, songs.song_file_id, files.id, files.name
    FROM songs
    LEFT JOIN files ON files.id = songs.song_file_id
";

#[derive(Clone, Debug)]
pub struct SongStore {
    db: Database,
}

impl SongStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a song referencing `file_id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownFileReference` if no file has that id.
    pub fn create(&self, file_id: i64) -> CoreResult<Song> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            let file = find_file(&tx, file_id)?.ok_or(CoreError::UnknownFileReference(file_id))?;
            tx.execute(
                "INSERT INTO songs (song_file_id) VALUES (?1)",
                params![file_id],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(Song { id, file })
        })
    }

    pub fn get(&self, id: i64) -> CoreResult<Song> {
        self.db
            .with_conn(|conn| find_song(conn, id))?
            .ok_or(CoreError::SongNotFound(id))
    }

    /// Points song `id` at `file_id`.
    ///
    /// # Errors
    ///
    /// - `CoreError::SongNotFound` if the song does not exist (checked first)
    /// - `CoreError::UnknownFileReference` if the file does not exist
    pub fn update(&self, id: i64, file_id: i64) -> CoreResult<Song> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            if !song_exists(&tx, id)? {
                return Err(CoreError::SongNotFound(id));
            }
            let file = find_file(&tx, file_id)?.ok_or(CoreError::UnknownFileReference(file_id))?;
            tx.execute(
                "UPDATE songs SET song_file_id = ?1 WHERE id = ?2",
                params![file_id, id],
            )?;
            tx.commit()?;
            Ok(Song { id, file })
        })
    }

    /// Deletes song `id`. The referenced file row is left untouched.
    pub fn delete(&self, id: i64) -> CoreResult<()> {
        self.db.with_conn(|conn| {
            match conn.execute("DELETE FROM songs WHERE id = ?1", params![id])? {
                0 => Err(CoreError::SongNotFound(id)),
                _ => Ok(()),
            }
        })
    }

    /// All songs, ordered by id (creation order).
    pub fn list(&self) -> CoreResult<Vec<Song>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&format!("{SELECT_SONGS} ORDER BY songs.id ASC"))?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(resolve).collect()
        })
    }
}

type SongRow = (i64, i64, Option<i64>, Option<String>);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SongRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn resolve((song_id, file_id, joined_id, joined_name): SongRow) -> CoreResult<Song> {
    match (joined_id, joined_name) {
        (Some(id), Some(name)) => Ok(Song {
            id: song_id,
            file: File { id, name },
        }),
        _ => {
            tracing::error!("song {} references missing file {}", song_id, file_id);
            Err(CoreError::DanglingFileReference { song_id, file_id })
        }
    }
}

fn find_song(conn: &Connection, id: i64) -> CoreResult<Option<Song>> {
    let row = conn
        .query_row(
            &format!("{SELECT_SONGS} WHERE songs.id = ?1"),
            params![id],
            read_row,
        )
        .optional()?;
    row.map(resolve).transpose()
}

fn song_exists(conn: &Connection, id: i64) -> CoreResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}
