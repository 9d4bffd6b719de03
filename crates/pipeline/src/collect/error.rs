//! Error types for the [`collect`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.

use derive_more::{Display, Error};

/// A collection error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for collection operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the origin of a collection failure.
///
/// Collection is fail-fast: any of these aborts the whole run. Whatever the
/// store already committed stays committed, and a later download run will
/// pick those records up.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The search provider query failed.
    Search,
    /// A store write via [`magpie_cache::Repository`] failed.
    Cache,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Search)
    }
}
