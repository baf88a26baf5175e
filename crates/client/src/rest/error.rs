//! Remote data service error types.

use std::sync::Arc;

/// Errors from the REST remote client.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// No API key configured.
    #[error("missing API key: BIZSYNC_API_KEY not set")]
    MissingApiKey,

    /// Base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The version table returned no rows.
    #[error("no data version row")]
    MissingVersion,
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { RemoteError::Timeout } else { RemoteError::Network(Arc::new(err)) }
    }
}

impl From<RemoteError> for bizsync_core::Error {
    fn from(err: RemoteError) -> Self {
        bizsync_core::Error::Remote(err.to_string())
    }
}
