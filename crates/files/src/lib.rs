//! Tuneful File Storage
//!
//! This crate owns the upload directory: the place where raw bytes of uploaded media files
//! live. It knows nothing about the database rows describing those files.
//!
//! ## Design Principles
//!
//! - Every filename is sanitised before it touches the filesystem
//! - All paths resolve inside the configured upload directory
//! - Blobs are keyed by their sanitised original filename
//! - Media type detection is best-effort (content first, then extension)
//!
//! ## Layout
//!
//! ```text
//! <upload_dir>/
//! ├── song1.mp3
//! ├── My_cool_song.flac
//! └── test.txt
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use tuneful_files::UploadsService;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let uploads = UploadsService::new(Path::new("uploads"))?;
//! let stored = uploads.write("../../My song.mp3", b"ID3...")?;
//! assert!(stored.ends_with("My_song.mp3"));
//! # Ok(())
//! # }
//! ```

mod constants;
mod paths;
mod uploads;

pub use constants::{DEFAULT_MEDIA_TYPE, UPLOADS_URL_PREFIX};
pub use paths::{public_path, sanitise_filename, upload_path};
pub use uploads::{detect_media_type, StoredUpload, UploadsService};

/// Errors that can occur during upload storage operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Upload directory could not be created or is not a directory
    #[error("Invalid upload directory: {0}")]
    InvalidUploadDirectory(String),

    /// Filename is empty once unsafe characters are removed
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    /// No blob is stored under the requested name
    #[error("Upload not found: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
