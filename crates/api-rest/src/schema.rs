//! Wire types for the REST API.
//!
//! Every response body is built from these structs so that the OpenAPI document and the
//! actual JSON stay in step.

use serde::{Deserialize, Serialize};
use tuneful_core::{File, Song};
use utoipa::ToSchema;

/// A stored file. `path` is the URL it can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRes {
    pub id: i64,
    pub name: String,
    #[schema(example = "/uploads/song1.mp3")]
    pub path: String,
}

impl From<File> for FileRes {
    fn from(file: File) -> Self {
        let path = file.path();
        Self {
            id: file.id,
            name: file.name,
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongRes {
    pub id: i64,
    pub file: FileRes,
}

impl From<Song> for SongRes {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            file: song.file.into(),
        }
    }
}

/// Reference to an existing file by id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileRefReq {
    pub id: i64,
}

/// Body of `POST /api/songs` and `PUT /api/songs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SongReq {
    pub file: FileRefReq,
}

/// Multipart form accepted by `POST /api/files`.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
