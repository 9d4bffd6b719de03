mod image;
mod tag;

pub use self::image::{ImageRecord, NewImage};
pub use self::tag::Tag;

pub(crate) use self::image::ImageRow;
pub(crate) use self::tag::TagRow;
