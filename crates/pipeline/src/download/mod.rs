//! Image download: the resumable second phase.
//!
//! Walks every record still marked pending, fetches its URL, streams the
//! body to `<folder>/<file name>`, probes the written file for ground-truth
//! metadata, and commits `retrieved = true` (plus the probed description)
//! one record at a time. Per-record commits are the resumability contract:
//! a crash mid-run leaves only the in-flight record unmarked.
//!
//! Failure taxonomy per record:
//! - transport error: logged, record stays pending, loop continues;
//! - non-success status: skipped without a log at error level, record
//!   stays pending (see the note at the status check);
//! - probe failure: logged, record is still marked retrieved with its
//!   old description (the bytes were written fine);
//! - filesystem or store failure: aborts the whole run.

pub mod error;

use crate::download::error::{ErrorKind, Result as DownloadResult};
use crate::error::{ErrorKind as PipelineErrorKind, Result};
use exn::ResultExt;
use futures::StreamExt;
use magpie_cache::{ImageRecord, Repository};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

/// How often a progress line is emitted, in completed records.
const PROGRESS_EVERY: usize = 10;

/// Summary of one download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Pending records at the start of the run
    pub total: usize,
    /// Records whose bytes were written and marked retrieved
    pub fetched: usize,
    /// Records skipped because the server answered with a non-success status
    pub skipped: usize,
    /// Records that failed at the transport level
    pub failed: usize,
}

/// Fetch every pending record's bytes into `folder`.
///
/// Creates `folder` if missing. Records that don't complete stay pending
/// and are simply attempted again by the next run.
#[instrument(skip(client, repo))]
pub async fn download_images(
    client: &reqwest::Client,
    repo: &Repository,
    folder: &Path,
) -> Result<DownloadReport> {
    download_inner(client, repo, folder).await.or_raise(|| PipelineErrorKind::Download)
}

async fn download_inner(
    client: &reqwest::Client,
    repo: &Repository,
    folder: &Path,
) -> DownloadResult<DownloadReport> {
    fs::create_dir_all(folder).await.map_err(ErrorKind::Io)?;
    let pending = repo.list_pending().await.or_raise(|| ErrorKind::Cache)?;
    let mut report = DownloadReport { total: pending.len(), ..Default::default() };
    tracing::info!(total = report.total, folder = %folder.display(), "starting download run");

    for (position, record) in pending.iter().enumerate() {
        match fetch_one(client, folder, record).await {
            Ok(Some(path)) => {
                let description = match magpie_extract::probe(&path) {
                    Ok(profile) => Some(profile.to_string()),
                    Err(err) => {
                        // Non-fatal: the bytes are on disk, only the probe
                        // came up empty. The old description stays.
                        tracing::warn!(path = %path.display(), error = %err, "could not read image metadata back");
                        None
                    },
                };
                repo.mark_retrieved(record.id, description.as_deref())
                    .await
                    .or_raise(|| ErrorKind::Cache)?;
                report.fetched += 1;
                let ordinal = position + 1;
                if ordinal % PROGRESS_EVERY == 0 {
                    tracing::info!("downloaded {ordinal}/{} images", report.total);
                }
            },
            Ok(None) => report.skipped += 1,
            Err(err) if matches!(&*err, ErrorKind::Transport(_)) => {
                tracing::error!(url = %record.url, error = %err, "error downloading image");
                report.failed += 1;
            },
            Err(err) => return Err(err),
        }
    }
    tracing::info!(
        fetched = report.fetched,
        skipped = report.skipped,
        failed = report.failed,
        "download run finished"
    );
    Ok(report)
}

/// Fetch a single record. `Ok(None)` means the server answered with a
/// non-success status and nothing was written.
async fn fetch_one(
    client: &reqwest::Client,
    folder: &Path,
    record: &ImageRecord,
) -> DownloadResult<Option<PathBuf>> {
    let file_name = validate_destination(&record.file_name)?;
    let response = client.get(&record.url).send().await.map_err(ErrorKind::Transport)?;
    if !response.status().is_success() {
        // Known limitation, kept on purpose: a 404 and a 503 look the same
        // here. The record stays pending with no backoff and no retry cap,
        // so it is re-attempted by every future run until one succeeds or
        // an operator steps in.
        tracing::debug!(url = %record.url, status = %response.status(), "skipping non-success response");
        return Ok(None);
    }
    let path = folder.join(file_name);
    let mut file = fs::File::create(&path).await.map_err(ErrorKind::Io)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ErrorKind::Transport)?;
        file.write_all(&chunk).await.map_err(ErrorKind::Io)?;
    }
    file.flush().await.map_err(ErrorKind::Io)?;
    Ok(Some(path))
}

/// The stored file name must be exactly one normal path component. It was
/// computed from sanitized input, so anything else means the row was
/// tampered with or corrupted.
fn validate_destination(name: &str) -> DownloadResult<&Path> {
    let path = Path::new(name);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if !component.as_encoded_bytes().contains(&0) => Ok(path),
        _ => exn::bail!(ErrorKind::InvalidName(name.to_string())),
    }
}
