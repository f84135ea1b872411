//! Library entities.
//!
//! Rows are copied out of the database into these owned values; nothing here holds a
//! connection or borrows from the store.

use tuneful_files::public_path;

/// An uploaded media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub id: i64,
    /// Sanitised original filename, also the blob key in the upload directory.
    pub name: String,
}

impl File {
    /// Public retrieval URL, e.g. `/uploads/song1.mp3`. Never persisted.
    pub fn path(&self) -> String {
        public_path(&self.name)
    }
}

/// A song and the file it plays.
///
/// The file is resolved by the store when the song is read, so a `Song` value always
/// carries an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub file: File,
}
