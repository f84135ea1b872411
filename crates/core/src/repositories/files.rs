//! File rows.
//!
//! A file row records the sanitised name of an uploaded blob. The API never deletes files;
//! [`FileStore::delete`] exists for maintenance and refuses to orphan songs.

use crate::db::Database;
use crate::models::File;
use crate::{CoreError, CoreResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

#[derive(Clone, Debug)]
pub struct FileStore {
    db: Database,
}

impl FileStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a file row and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for a blank name, `CoreError::Database` otherwise.
    pub fn create(&self, name: &str) -> CoreResult<File> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput("file name cannot be empty".into()));
        }

        self.db.with_conn(|conn| {
            conn.execute("INSERT INTO files (name) VALUES (?1)", params![name])?;
            Ok(File {
                id: conn.last_insert_rowid(),
                name: name.to_owned(),
            })
        })
    }

    pub fn get(&self, id: i64) -> CoreResult<File> {
        self.db
            .with_conn(|conn| find_file(conn, id))?
            .ok_or(CoreError::FileNotFound(id))
    }

    /// All files, ordered by id.
    pub fn list(&self) -> CoreResult<Vec<File>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT id, name FROM files ORDER BY id ASC")?;
            let files = stmt
                .query_map([], |row| {
                    Ok(File {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(files)
        })
    }

    /// Deletes a file row.
    ///
    /// # Errors
    ///
    /// - `CoreError::FileNotFound` if no such row exists
    /// - `CoreError::FileInUse` if a song still references it
    pub fn delete(&self, id: i64) -> CoreResult<()> {
        self.db.with_conn(|conn| {
            match conn.execute("DELETE FROM files WHERE id = ?1", params![id]) {
                Ok(0) => Err(CoreError::FileNotFound(id)),
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(CoreError::FileInUse(id))
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}

pub(crate) fn find_file(conn: &Connection, id: i64) -> CoreResult<Option<File>> {
    let file = conn
        .query_row(
            "SELECT id, name FROM files WHERE id = ?1",
            params![id],
            |row| {
                Ok(File {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FileStore {
        FileStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let store = store();

        let first = store.create("song1.mp3").unwrap();
        let second = store.create("song2.mp3").unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.name, "song1.mp3");
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let err = store().create("  ").expect_err("should reject");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_get_returns_created_file() {
        let store = store();
        let created = store.create("song1.mp3").unwrap();

        assert_eq!(store.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let err = store().get(42).expect_err("should be missing");
        assert!(matches!(err, CoreError::FileNotFound(42)));
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let store = store();
        assert!(store.list().unwrap().is_empty());

        let a = store.create("a.mp3").unwrap();
        let b = store.create("b.mp3").unwrap();
        let c = store.create("c.mp3").unwrap();

        assert_eq!(store.list().unwrap(), vec![a, b, c]);
    }

    #[test]
    fn test_delete_removes_row() {
        let store = store();
        let file = store.create("a.mp3").unwrap();

        store.delete(file.id).unwrap();

        assert!(matches!(
            store.get(file.id),
            Err(CoreError::FileNotFound(_))
        ));
        assert!(matches!(
            store.delete(file.id),
            Err(CoreError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_delete_refuses_referenced_file() {
        let db = Database::open_in_memory().unwrap();
        let files = FileStore::new(db.clone());
        let songs = crate::repositories::SongStore::new(db);
        let file = files.create("a.mp3").unwrap();
        songs.create(file.id).unwrap();

        let err = files.delete(file.id).expect_err("should refuse");

        assert!(matches!(err, CoreError::FileInUse(id) if id == file.id));
        assert!(files.get(file.id).is_ok());
    }
}
