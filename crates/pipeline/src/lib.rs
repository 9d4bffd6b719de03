//! The two-phase collect/download pipeline.
//!
//! Phase one ([`collect_metadata`]) asks a search provider for results and
//! durably records one image row per result: metadata first, no bytes
//! fetched. Phase two ([`download_images`]) walks every row still marked
//! pending, fetches the bytes, and folds ground-truth metadata read back
//! from the file into the record. The phases share nothing but the store,
//! which is what makes the download pass resumable: interrupt it anywhere
//! and the next run picks up exactly the records that never completed.
//!
//! Everything is strictly sequential. One provider query, then one record
//! at a time; one fetch, then one commit. There is no concurrency to
//! coordinate and no ordering guarantee beyond iteration order.

pub mod collect;
pub mod download;
pub mod error;
mod filename;

pub use crate::collect::{Collected, collect_metadata};
pub use crate::download::{DownloadReport, download_images};
pub use crate::filename::sanitize_title;
