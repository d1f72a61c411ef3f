//! Error types for the HTTP execution boundary.

use thiserror::Error;

/// Failure reported by an [`HttpClient`](super::HttpClient) or while
/// building the absolute request URL.
///
/// These are passed through to callers opaquely as
/// [`ScmError::Transport`](crate::ScmError::Transport).
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed, or the response body could not be read.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The base URL or relative path could not be turned into a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header could not be encoded (for example a token containing newlines).
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
