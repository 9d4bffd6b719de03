//! Error types for the [`download`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// A download error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for download operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a download failure.
///
/// Only [`ErrorKind::Transport`] is caught per record; everything else
/// aborts the run. That split mirrors the failure taxonomy of the pipeline:
/// a flaky remote host is business as usual, a failing disk or store is not.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Network-level fetch failure (connect, TLS, timeout, interrupted body).
    #[display("transport error: {_0}")]
    Transport(reqwest::Error),
    /// Local filesystem failure while writing the image.
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// A cache lookup or update via [`magpie_cache::Repository`] failed.
    Cache,
    /// The record's stored file name is not a plain file name (empty, or
    /// contains path separators / traversal).
    #[display("unusable destination name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io(_))
    }
}
