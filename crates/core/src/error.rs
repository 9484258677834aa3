//! Unified error types for photofeed.
//!
//! The first six variants are the cache and fetch taxonomy the loaders
//! report; the rest are infrastructure failures of the concrete stores.

use tokio_rusqlite::rusqlite;

/// Unified error types for the photofeed core and client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No valid cached entry (absent or expired) for a key.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The store failed to read for a reason other than "not found".
    #[error("READ_FAILED: {0}")]
    ReadFailed(String),

    /// The insert step of a cache write failed.
    #[error("SAVE_FAILED: {0}")]
    SaveFailed(String),

    /// The delete-before-insert step of a cache write failed.
    #[error("OLD_DATA_REMOVAL_FAILED: {0}")]
    OldDataRemovalFailed(String),

    /// The bulk expiration sweep failed.
    #[error("INVALIDATE_FAILED: {0}")]
    InvalidateFailed(String),

    /// Remote transport, status or decoding failure.
    #[error("FETCH_FAILED: {0}")]
    FetchFailed(String),

    /// A key or endpoint could not be parsed as a URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Whether this error means "nothing usable is cached".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
