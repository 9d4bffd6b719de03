//! Repository for image records and their tags.
//!
//! The two entity types are managed together: tags exist only as labels on
//! image records, and the join table is membership-only (attaching a tag a
//! second time is a no-op by design, not an error).

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{ImageRecord, ImageRow, NewImage, Tag, TagRow};
use exn::ResultExt;
use sqlx::SqlitePool;

/// Repository for the image store.
///
/// Thin wrapper around the connection pool; every method maps to one
/// statement (or one small transaction) and commits before returning. The
/// download pass depends on that: a crash between records leaves every
/// completed record durably marked.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}
impl From<&Database> for Repository {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Insert a freshly discovered image and return its assigned id.
    ///
    /// The record starts out pending (`retrieved = false`) with an empty
    /// file name; callers compute the destination name from the returned id
    /// and persist it via [`set_file_name`](Self::set_file_name).
    pub async fn insert(&self, image: &NewImage) -> Result<i64> {
        let file_size = image
            .file_size
            .map(i64::try_from)
            .transpose()
            .or_raise(|| ErrorKind::InvalidData("file size"))?;
        let id: i64 = sqlx::query_scalar(include_str!("../queries/insert_image.sql"))
            .bind(&image.url)
            .bind(&image.title)
            .bind(&image.description)
            .bind(image.width.map(i64::from))
            .bind(image.height.map(i64::from))
            .bind(&image.file_type)
            .bind(file_size)
            .fetch_one(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(id)
    }

    /// Persist the computed destination file name for a record.
    pub async fn set_file_name(&self, id: i64, file_name: impl AsRef<str>) -> Result<()> {
        let result = sqlx::query(include_str!("../queries/set_file_name.sql"))
            .bind(file_name.as_ref())
            .bind(id)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::ImageNotFound(id));
        }
        Ok(())
    }

    /// Get a single record by id.
    pub async fn get(&self, id: i64) -> Result<Option<ImageRecord>> {
        let row: Option<ImageRow> = sqlx::query_as(include_str!("../queries/get_image.sql"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        row.map(ImageRecord::try_from).transpose()
    }

    /// List every record whose bytes have not been fetched yet, in id order.
    ///
    /// This is the whole work list for a download run. Records already
    /// marked retrieved are never revisited, even if the file on disk has
    /// since gone missing.
    pub async fn list_pending(&self) -> Result<Vec<ImageRecord>> {
        let rows: Vec<ImageRow> = sqlx::query_as(include_str!("../queries/list_pending.sql"))
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(ImageRecord::try_from).collect()
    }

    /// Mark a record's bytes as written to disk, optionally replacing its
    /// description with the probed technical summary.
    ///
    /// Passing `None` keeps the stored description unchanged; that's the
    /// path taken when the file was written but couldn't be decoded.
    pub async fn mark_retrieved(&self, id: i64, description: Option<&str>) -> Result<()> {
        let result = sqlx::query(include_str!("../queries/mark_retrieved.sql"))
            .bind(id)
            .bind(description)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        if result.rows_affected() == 0 {
            exn::bail!(ErrorKind::ImageNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Attach a tag to a record, creating the tag row if the name has never
    /// been used before.
    ///
    /// Idempotent: a name maps to exactly one tag row, and re-attaching an
    /// existing association changes nothing. The lookup-or-create and the
    /// join insert run in one transaction.
    pub async fn attach_tag(&self, image_id: i64, name: impl AsRef<str>) -> Result<Tag> {
        let name = name.as_ref();
        let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/ensure_tag.sql"))
            .bind(name)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        let tag: TagRow = sqlx::query_as(include_str!("../queries/get_tag_by_name.sql"))
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        sqlx::query(include_str!("../queries/attach_tag.sql"))
            .bind(image_id)
            .bind(tag.id)
            .execute(&mut *tx)
            .await
            .or_raise(|| ErrorKind::Database)?;
        tx.commit().await.or_raise(|| ErrorKind::Database)?;
        Ok(tag.into())
    }

    /// Remove a tag association from a record.
    ///
    /// The tag row itself survives, even when nothing references it any
    /// more. Returns `false` when there was nothing to detach.
    pub async fn detach_tag(&self, image_id: i64, name: impl AsRef<str>) -> Result<bool> {
        let result = sqlx::query(include_str!("../queries/detach_tag.sql"))
            .bind(image_id)
            .bind(name.as_ref())
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// List the tags attached to a record, sorted by name.
    pub async fn tags_for(&self, image_id: i64) -> Result<Vec<Tag>> {
        let rows: Vec<TagRow> = sqlx::query_as(include_str!("../queries/tags_for_image.sql"))
            .bind(image_id)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    /// List every record carrying the given tag name, in id order.
    pub async fn find_tagged(&self, name: impl AsRef<str>) -> Result<Vec<ImageRecord>> {
        let rows: Vec<ImageRow> = sqlx::query_as(include_str!("../queries/images_for_tag.sql"))
            .bind(name.as_ref())
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(ImageRecord::try_from).collect()
    }
}
