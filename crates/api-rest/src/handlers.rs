//! Route handlers.
//!
//! Negotiation has already happened by the time these run (see [`crate::negotiation`]).
//! Each handler parses its input, calls the [`MediaLibrary`](tuneful_core::MediaLibrary)
//! and shapes the result; failures surface as [`ApiError`].

use crate::error::ApiError;
use crate::schema::{FileRes, HealthRes, MessageRes, SongReq, SongRes, UploadForm};
use crate::AppState;
use axum::body::{Body, Bytes};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tuneful_core::validation::validate_song_payload;
use tuneful_core::SONGS_COLLECTION_PATH;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Tuneful REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/songs",
    responses(
        (status = 200, description = "All songs in creation order", body = [SongRes]),
        (status = 406, description = "Client does not accept JSON", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// List every song with its file
#[axum::debug_handler]
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<SongRes>>, ApiError> {
    let songs = state.library.list_songs()?;
    Ok(Json(songs.into_iter().map(SongRes::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/songs",
    request_body = SongReq,
    responses(
        (status = 201, description = "Song created", body = SongRes,
            headers(("Location" = String, description = "Song collection URL"))),
        (status = 400, description = "Body is not JSON", body = MessageRes),
        (status = 406, description = "Client does not accept JSON", body = MessageRes),
        (status = 415, description = "Body is not application/json", body = MessageRes),
        (status = 422, description = "Invalid payload or unknown file", body = MessageRes)
    )
)]
/// Create a song referencing an existing file
///
/// # Errors
/// Returns `422 Unprocessable Entity` if the payload does not match the song schema or
/// references a file that does not exist.
#[axum::debug_handler]
pub async fn create_song(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let file_id = parse_song_payload(&body)?;
    let song = state.library.create_song(file_id)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, SONGS_COLLECTION_PATH)],
        Json(SongRes::from(song)),
    )
        .into_response())
}

#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    params(("id" = i64, Path, description = "Song id")),
    request_body = SongReq,
    responses(
        (status = 200, description = "Song updated", body = SongRes,
            headers(("Location" = String, description = "Song collection URL"))),
        (status = 400, description = "Body is not JSON", body = MessageRes),
        (status = 404, description = "No such song", body = MessageRes),
        (status = 406, description = "Client does not accept JSON", body = MessageRes),
        (status = 415, description = "Body is not application/json", body = MessageRes),
        (status = 422, description = "Invalid payload or unknown file", body = MessageRes)
    )
)]
/// Point an existing song at a different file
///
/// The song is looked up before the body is validated, so an unknown id is always a 404.
#[axum::debug_handler]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let id = parse_song_id(&id)?;
    state.library.get_song(id)?;

    let file_id = parse_song_payload(&body)?;
    let song = state.library.update_song(id, file_id)?;

    Ok((
        StatusCode::OK,
        [(header::LOCATION, SONGS_COLLECTION_PATH)],
        Json(SongRes::from(song)),
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    params(("id" = i64, Path, description = "Song id")),
    responses(
        (status = 200, description = "Song deleted", body = MessageRes),
        (status = 404, description = "No such song", body = MessageRes),
        (status = 406, description = "Client does not accept JSON", body = MessageRes)
    )
)]
/// Delete a song, leaving its file in place
#[axum::debug_handler]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let id = parse_song_id(&id)?;
    state.library.delete_song(id)?;

    Ok(Json(MessageRes {
        message: format!("Successfully deleted song with id {id}"),
    }))
}

#[utoipa::path(
    post,
    path = "/api/files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = FileRes),
        (status = 406, description = "Client does not accept JSON", body = MessageRes),
        (status = 413, description = "Upload too large", body = MessageRes),
        (status = 415, description = "Body is not multipart/form-data", body = MessageRes),
        (status = 422, description = "No file part or unusable filename", body = MessageRes)
    )
)]
/// Upload a media file
///
/// Reads the `file` part of the form. Parts without a filename do not count as file data.
#[axum::debug_handler]
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileRes>), ApiError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => continue,
        };
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::unprocessable("Could not find file data"))?;
    let file = state.library.upload_file(&filename, &bytes)?;

    Ok((StatusCode::CREATED, Json(FileRes::from(file))))
}

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(("filename" = String, Path, description = "Sanitised filename")),
    responses(
        (status = 200, description = "Raw file contents"),
        (status = 404, description = "No such upload", body = MessageRes)
    )
)]
/// Serve a previously uploaded file
#[axum::debug_handler]
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let stored = state.library.read_upload(&filename)?;

    Ok((
        [(header::CONTENT_TYPE, stored.media_type)],
        Body::from(stored.bytes),
    )
        .into_response())
}

fn parse_song_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("Could not find song with id {raw}")))
}

fn parse_song_payload(body: &[u8]) -> Result<i64, ApiError> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"))
    })?;
    Ok(validate_song_payload(&payload)?)
}

fn multipart_error(err: MultipartError) -> ApiError {
    tracing::warn!("multipart error: {}", err);
    ApiError::new(err.status(), err.body_text())
}
