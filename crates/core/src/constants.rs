//! Constants used throughout the Tuneful core crate.
//!
//! Defaults for configuration live here so that the server binary, the CLI and the tests
//! agree on them.

/// Default SQLite database file for the production configuration.
pub const DEFAULT_DATABASE_FILE: &str = "tuneful.db";

/// Default upload directory for the production configuration.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Default upload directory for the testing configuration.
pub const TEST_UPLOAD_DIR: &str = "test-uploads";

/// Default maximum accepted upload size (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Location of the song collection; returned in `Location` headers.
pub const SONGS_COLLECTION_PATH: &str = "/api/songs";
