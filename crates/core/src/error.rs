//! Unified error types for bizsync.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the sync engine and its surfaces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty business id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Requested record is not in the working copy.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A record could not be serialized for the local store.
    #[error("CACHE_ERROR: encode failed: {0}")]
    Encode(String),

    /// An inbound payload could not be decoded.
    #[error("DECODE_FAILED: {0}")]
    Decode(String),

    /// The remote data source could not be reached or answered with an error.
    #[error("REMOTE_UNAVAILABLE: {0}")]
    Remote(String),

    /// Nothing can be shown: no cache and no remote.
    #[error("LOAD_FAILED: {0}")]
    LoadFailed(String),

    /// The change feed subscription has been torn down.
    #[error("FEED_CLOSED")]
    FeedClosed,
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

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Encode(msg) => (-32002, msg.clone()),
            Error::Decode(msg) => (-32003, msg.clone()),
            Error::Remote(msg) => (-32004, msg.clone()),
            Error::LoadFailed(msg) => (-32005, msg.clone()),
            Error::FeedClosed => (-32006, "Change feed is closed".to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
