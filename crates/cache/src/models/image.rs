use crate::error::{Error, ErrorKind};
use exn::ResultExt;

/// Fields of an image record known at collection time, before the store has
/// assigned an id.
///
/// Everything here is copied straight from a search result; the provider is
/// free to omit most of it (empty strings / `None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewImage {
    /// Source URL of the full-size image
    pub url: String,
    pub title: String,
    /// Provider-supplied description, if any
    pub description: String,
    /// Dimensions as declared by the provider (not yet verified)
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// File type as declared by the provider
    pub file_type: String,
    /// File size in bytes as declared by the provider
    pub file_size: Option<u64>,
}

/// A persisted image record.
///
/// Created during the collect phase with `retrieved = false` and an empty
/// file name; the download phase flips `retrieved` and rewrites the
/// description with metadata probed from the actual bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Store-assigned identifier, embedded in the computed file name
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_type: String,
    pub file_size: Option<u64>,
    /// Computed destination file name, relative to the download folder
    pub file_name: String,
    /// Whether the bytes have been successfully written to disk
    pub retrieved: bool,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ImageRow {
    pub(crate) id: i64,
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) width: Option<i64>,
    pub(crate) height: Option<i64>,
    pub(crate) file_type: String,
    pub(crate) file_size: Option<i64>,
    pub(crate) file_name: String,
    pub(crate) retrieved: bool,
}

impl TryFrom<ImageRow> for ImageRecord {
    type Error = Error;
    fn try_from(row: ImageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            url: row.url,
            title: row.title,
            description: row.description,
            width: row.width.map(u32::try_from).transpose().or_raise(|| ErrorKind::InvalidData("width"))?,
            height: row.height.map(u32::try_from).transpose().or_raise(|| ErrorKind::InvalidData("height"))?,
            file_type: row.file_type,
            file_size: row
                .file_size
                .map(u64::try_from)
                .transpose()
                .or_raise(|| ErrorKind::InvalidData("file size"))?,
            file_name: row.file_name,
            retrieved: row.retrieved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row() -> ImageRow {
        ImageRow {
            id: 7,
            url: "http://example.com/pics/starling.jpg".to_string(),
            title: "A starling".to_string(),
            description: "a bird on a branch".to_string(),
            width: Some(1024),
            height: Some(768),
            file_type: "jpg".to_string(),
            file_size: Some(204_800),
            file_name: "a_starling_20240101000000_7.jpg".to_string(),
            retrieved: false,
        }
    }

    #[test]
    fn test_row_to_model() {
        let record = ImageRecord::try_from(make_row()).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.width, Some(1024));
        assert_eq!(record.file_size, Some(204_800));
        assert!(!record.retrieved);
    }

    #[test]
    fn test_row_with_missing_dimensions() {
        let mut row = make_row();
        row.width = None;
        row.height = None;
        row.file_size = None;
        let record = ImageRecord::try_from(row).unwrap();
        assert_eq!(record.width, None);
        assert_eq!(record.height, None);
        assert_eq!(record.file_size, None);
    }

    #[test]
    fn test_row_with_negative_width_is_rejected() {
        let mut row = make_row();
        row.width = Some(-1);
        let err = ImageRecord::try_from(row).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData("width")));
    }
}
