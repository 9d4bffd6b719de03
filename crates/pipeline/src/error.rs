//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which phase of the pipeline failed.
///
/// The cause chain carries the phase-specific kind (see
/// [`collect::error`](crate::collect::error) and
/// [`download::error`](crate::download::error)).
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("metadata collection failed")]
    Collect,
    #[display("image download run failed")]
    Download,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A re-run of either phase is always safe; whether it helps depends
        // on the underlying cause.
        false
    }
}
