//! SQLite connection handling.
//!
//! A single connection is shared behind a mutex. Every store operation takes the lock for
//! the duration of one statement or transaction and releases it before returning, so
//! handlers never hold database state across requests.

use crate::config::DatabaseLocation;
use crate::{CoreError, CoreResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS files (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS songs (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        song_file_id INTEGER NOT NULL REFERENCES files(id)
    );
    CREATE INDEX IF NOT EXISTS idx_songs_song_file_id ON songs(song_file_id);
";

/// Shared handle to the library database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Opens (creating if needed) the database at `location` and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the database cannot be opened or migrated.
    pub fn open(location: &DatabaseLocation) -> CoreResult<Self> {
        let conn = match location {
            DatabaseLocation::File(path) => {
                tracing::info!("opening library database at {}", path.display());
                Connection::open(path)?
            }
            DatabaseLocation::InMemory => {
                tracing::info!("opening in-memory library database");
                Connection::open_in_memory()?
            }
        };
        Self::initialise(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open(&DatabaseLocation::InMemory)
    }

    fn initialise(conn: Connection) -> CoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut conn = self.conn.lock().map_err(|_| CoreError::LockPoisoned)?;
        f(&mut conn)
    }
}
