//! # API REST
//!
//! REST API implementation for Tuneful.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Content negotiation guards (`Accept` / `Content-Type`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, error bodies, CORS)
//!
//! Uses `tuneful-core` for all library operations.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod negotiation;
pub mod schema;


use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tuneful_core::MediaLibrary;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state for the REST API server
///
/// Cloned into every request; the library inside shares one database handle.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<MediaLibrary>,
}

impl AppState {
    pub fn new(library: MediaLibrary) -> Self {
        Self {
            library: Arc::new(library),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_songs,
        handlers::create_song,
        handlers::update_song,
        handlers::delete_song,
        handlers::upload_file,
        handlers::serve_upload,
    ),
    components(schemas(
        schema::FileRes,
        schema::SongRes,
        schema::FileRefReq,
        schema::SongReq,
        schema::UploadForm,
        schema::MessageRes,
        schema::HealthRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// Every `/api` route sits behind the `Accept` guard; song writes additionally require a
/// JSON body and uploads a multipart body limited to `max_upload_bytes`.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let song_writes: Router<AppState> = Router::new()
        .route("/api/songs", post(handlers::create_song))
        .route("/api/songs/:id", put(handlers::update_song))
        .route_layer(middleware::from_fn(negotiation::require_json));

    let uploads: Router<AppState> = Router::new()
        .route("/api/files", post(handlers::upload_file))
        .route_layer(middleware::from_fn(negotiation::require_multipart))
        .layer(DefaultBodyLimit::max(max_upload_bytes));

    let api: Router<AppState> = Router::new()
        .route("/api/songs", get(handlers::list_songs))
        .route("/api/songs/:id", delete(handlers::delete_song))
        .merge(song_writes)
        .merge(uploads)
        .route_layer(middleware::from_fn(negotiation::accept_json));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/uploads/:filename", get(handlers::serve_upload))
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
