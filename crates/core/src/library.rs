//! Media library service.
//!
//! [`MediaLibrary`] is the entry point used by the REST API and the CLI. It composes the
//! file and song stores with upload storage and owns the one multi-step operation in the
//! system: accepting an upload.

use crate::config::CoreConfig;
use crate::db::Database;
use crate::models::{File, Song};
use crate::repositories::{FileStore, SongStore};
use crate::{CoreError, CoreResult};
use tuneful_files::{sanitise_filename, StoredUpload, UploadsService};

#[derive(Clone, Debug)]
pub struct MediaLibrary {
    files: FileStore,
    songs: SongStore,
    uploads: UploadsService,
}

impl MediaLibrary {
    /// Opens the database and upload directory named by `cfg`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the database cannot be opened or the upload directory
    /// cannot be created.
    pub fn open(cfg: &CoreConfig) -> CoreResult<Self> {
        let db = Database::open(cfg.database())?;
        let uploads = UploadsService::new(cfg.upload_dir())?;
        Ok(Self::new(db, uploads))
    }

    pub fn new(db: Database, uploads: UploadsService) -> Self {
        Self {
            files: FileStore::new(db.clone()),
            songs: SongStore::new(db),
            uploads,
        }
    }

    pub fn uploads(&self) -> &UploadsService {
        &self.uploads
    }

    pub fn list_songs(&self) -> CoreResult<Vec<Song>> {
        self.songs.list()
    }

    pub fn get_song(&self, id: i64) -> CoreResult<Song> {
        self.songs.get(id)
    }

    pub fn create_song(&self, file_id: i64) -> CoreResult<Song> {
        let song = self.songs.create(file_id)?;
        tracing::info!("created song {} for file {}", song.id, file_id);
        Ok(song)
    }

    pub fn update_song(&self, id: i64, file_id: i64) -> CoreResult<Song> {
        let song = self.songs.update(id, file_id)?;
        tracing::info!("song {} now references file {}", id, file_id);
        Ok(song)
    }

    pub fn delete_song(&self, id: i64) -> CoreResult<()> {
        self.songs.delete(id)?;
        tracing::info!("deleted song {}", id);
        Ok(())
    }

    pub fn list_files(&self) -> CoreResult<Vec<File>> {
        self.files.list()
    }

    pub fn get_file(&self, id: i64) -> CoreResult<File> {
        self.files.get(id)
    }

    /// Stores an uploaded blob and records it as a file.
    ///
    /// The name is sanitised, a row is inserted, then the blob is written under the
    /// sanitised name. If the write fails the row is removed again so no metadata is left
    /// pointing at a missing blob.
    ///
    /// # Errors
    ///
    /// - `CoreError::Files(InvalidFilename)` if the name sanitises to nothing
    /// - `CoreError::Files` if the blob cannot be written (row rolled back)
    /// - `CoreError::CleanupAfterUploadFailed` if the rollback also fails
    pub fn upload_file(&self, original_name: &str, bytes: &[u8]) -> CoreResult<File> {
        let name = sanitise_filename(original_name)?;
        let file = self.files.create(&name)?;

        if let Err(upload_error) = self.uploads.write(&name, bytes) {
            tracing::error!("writing upload {} failed: {}", name, upload_error);
            return match self.files.delete(file.id) {
                Ok(()) => Err(upload_error.into()),
                Err(cleanup_error) => Err(CoreError::CleanupAfterUploadFailed {
                    file_id: file.id,
                    upload_error,
                    cleanup_error: Box::new(cleanup_error),
                }),
            };
        }

        tracing::info!("stored upload {} as file {}", name, file.id);
        Ok(file)
    }

    /// Reads a stored blob by its sanitised filename.
    pub fn read_upload(&self, filename: &str) -> CoreResult<StoredUpload> {
        Ok(self.uploads.read(filename)?)
    }
}
