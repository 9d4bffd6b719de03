/// A named label attached to image records.
///
/// Names are unique; a tag row is created lazily the first time its name is
/// attached to any record, and is never deleted or renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(sqlx::FromRow)]
pub(crate) struct TagRow {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self { id: row.id, name: row.name }
    }
}
