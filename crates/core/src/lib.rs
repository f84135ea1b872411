//! # Tuneful Core
//!
//! Core business logic for the Tuneful song library.
//!
//! This crate contains pure data operations:
//! - File and song stores backed by SQLite
//! - Validation of song payloads
//! - The [`MediaLibrary`] service tying stores and upload storage together
//!
//! **No API concerns**: HTTP routing, content negotiation and response shaping belong in
//! `api-rest`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod library;
pub mod models;
pub mod repositories;
pub mod validation;

pub use config::{CoreConfig, DatabaseLocation, Environment};
pub use constants::*;
pub use db::Database;
pub use error::{CoreError, CoreResult};
pub use library::MediaLibrary;
pub use models::{File, Song};
pub use repositories::{FileStore, SongStore};
pub use tuneful_files::{FilesError, StoredUpload, UploadsService};
