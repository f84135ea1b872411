#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not find song with id {0}")]
    SongNotFound(i64),
    #[error("Could not find file with id {0}")]
    FileNotFound(i64),
    #[error("Could not find file with id {0}")]
    UnknownFileReference(i64),
    #[error("file with id {0} is still referenced by a song")]
    FileInUse(i64),
    #[error("song {song_id} references missing file {file_id}")]
    DanglingFileReference { song_id: i64, file_id: i64 },

    #[error("{0}")]
    Schema(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    LockPoisoned,

    #[error("upload storage error: {0}")]
    Files(#[from] tuneful_files::FilesError),
    #[error(
        "upload of file {file_id} failed and removing its row also failed: upload={upload_error}; cleanup={cleanup_error}"
    )]
    CleanupAfterUploadFailed {
        file_id: i64,
        #[source]
        upload_error: tuneful_files::FilesError,
        cleanup_error: Box<CoreError>,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
