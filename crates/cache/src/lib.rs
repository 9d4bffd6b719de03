//! SQLite store for harvested image metadata.
//!
//! This crate owns the persistence model of the two-phase pipeline: image
//! records are inserted during collection (before any bytes exist on disk)
//! and flipped to `retrieved` one by one during the download pass. The
//! `retrieved` flag is what makes downloads resumable: a crashed run
//! leaves at most the in-flight record unmarked.
//!
//! # Entities
//! - **Images**: one row per discovered search result, keyed by a
//!   store-assigned rowid. The id is part of the computed file name, which
//!   is why insertion happens before the name is known.
//! - **Tags**: unique names, created lazily on first attach, joined to
//!   images through a membership-only many-to-many table.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{ImageRecord, NewImage, Tag};
pub use crate::repo::Repository;
