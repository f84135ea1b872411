//! Library stores.
//!
//! One store per table. Both wrap the same [`Database`](crate::db::Database) handle and are
//! cheap to clone.

pub mod files;
pub mod songs;

pub use files::FileStore;
pub use songs::SongStore;
