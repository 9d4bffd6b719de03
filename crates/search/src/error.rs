//! Search Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A search error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Request-level failure (connect, TLS, timeout, non-success status).
    #[display("search request failed: {_0}")]
    Http(reqwest::Error),
    /// The search page didn't contain a request token; the provider may
    /// have changed its markup.
    #[display("no request token in search page")]
    Token,
    /// The result payload didn't parse as the expected JSON shape.
    #[display("malformed search results")]
    Malformed,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}
