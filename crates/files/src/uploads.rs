//! Upload directory storage service
//!
//! [`UploadsService`] is bound to one upload directory and performs all blob I/O for the
//! application. Blobs are stored flat, keyed by their sanitised original filename:
//!
//! ```text
//! <upload_dir>/
//! └── <sanitised filename>
//! ```
//!
//! # Security Model
//!
//! - The upload directory is created if missing and canonicalised at construction
//! - Every filename goes through [`sanitise_filename`] before use
//! - Reads refuse names that are not already in sanitised form, so a request for
//!   `../x` can never be answered with the contents of `x`
//!
//! # Overwrites
//!
//! Two uploads whose names sanitise to the same key share one blob; the later write wins.

use crate::constants::DEFAULT_MEDIA_TYPE;
use crate::paths::{sanitise_filename, upload_path};
use crate::FilesError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A blob read back from the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Raw bytes exactly as uploaded
    pub bytes: Vec<u8>,

    /// Detected media type (always populated; see [`detect_media_type`])
    pub media_type: String,
}

/// Service for storing and retrieving uploaded blobs
#[derive(Debug, Clone)]
pub struct UploadsService {
    upload_dir: PathBuf,
}

impl UploadsService {
    /// Creates a service bound to `upload_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created or canonicalised
    pub fn new(upload_dir: &Path) -> Result<Self, FilesError> {
        if upload_dir.exists() && !upload_dir.is_dir() {
            return Err(FilesError::InvalidUploadDirectory(format!(
                "Path is not a directory: {}",
                upload_dir.display()
            )));
        }

        fs::create_dir_all(upload_dir).map_err(|e| {
            FilesError::InvalidUploadDirectory(format!(
                "Cannot create {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        let upload_dir = upload_dir.canonicalize().map_err(|e| {
            FilesError::InvalidUploadDirectory(format!(
                "Cannot canonicalize path {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        Ok(Self { upload_dir })
    }

    /// Returns the canonical upload directory.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Writes `bytes` under the sanitised form of `filename`.
    ///
    /// Returns the absolute path written.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if the filename sanitises to nothing or the write fails.
    pub fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, FilesError> {
        let path = upload_path(&self.upload_dir, Some(filename))?;

        fs::write(&path, bytes).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write upload to {}: {}", path.display(), e),
            ))
        })?;

        tracing::debug!("stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Reads a previously stored blob.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::NotFound` if `filename` is not a sanitised name or no blob is
    /// stored under it, and `FilesError::Io` for any other read failure.
    pub fn read(&self, filename: &str) -> Result<StoredUpload, FilesError> {
        let path = self.existing_path(filename)?;

        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FilesError::NotFound(filename.to_owned()),
            _ => FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read upload from {}: {}", path.display(), e),
            )),
        })?;

        let media_type = detect_media_type(filename, &bytes);
        Ok(StoredUpload { bytes, media_type })
    }

    /// Removes a stored blob. Removing a blob that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if the filename is invalid or removal fails.
    pub fn remove(&self, filename: &str) -> Result<(), FilesError> {
        let path = upload_path(&self.upload_dir, Some(filename))?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FilesError::Io(e)),
        }
    }

    fn existing_path(&self, filename: &str) -> Result<PathBuf, FilesError> {
        match sanitise_filename(filename) {
            Ok(sanitised) if sanitised == filename => {
                let path = self.upload_dir.join(sanitised);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(FilesError::NotFound(filename.to_owned()))
                }
            }
            _ => Err(FilesError::NotFound(filename.to_owned())),
        }
    }
}

/// Detects the media type of a blob.
///
/// Content sniffing wins; the filename extension is the fallback; anything unrecognised is
/// `application/octet-stream`.
pub fn detect_media_type(filename: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_owned();
    }

    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned())
}
