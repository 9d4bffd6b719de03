//! Ground-truth metadata extraction for downloaded images.
//!
//! Search providers declare dimensions and file types, but the only numbers
//! worth keeping are the ones read back from the bytes actually written to
//! disk. [`probe`] decodes a file once and reports what it really is; the
//! pipeline folds the result into the record's description.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use image::{ColorType, GenericImageView, ImageFormat, ImageReader};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// What a downloaded file turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProfile {
    /// Decoded pixel width
    pub width: u32,
    /// Decoded pixel height
    pub height: u32,
    /// Container format, when the decoder could tell
    pub format: Option<ImageFormat>,
    /// In-memory sample layout of the decoded image
    pub color: ColorType,
}

impl ImageProfile {
    /// Uppercase short name of the container format (`JPEG`, `PNG`, …).
    pub fn format_label(&self) -> String {
        match self.format {
            Some(format) => format!("{format:?}").to_uppercase(),
            None => "unknown".to_string(),
        }
    }

    /// Compact color-mode label (`RGB`, `RGBA`, `L`, …), in the vocabulary
    /// most image tooling uses for these layouts.
    pub fn mode_label(&self) -> &'static str {
        match self.color {
            ColorType::L8 => "L",
            ColorType::La8 => "LA",
            ColorType::Rgb8 => "RGB",
            ColorType::Rgba8 => "RGBA",
            ColorType::L16 => "L;16",
            ColorType::La16 => "LA;16",
            ColorType::Rgb16 => "RGB;16",
            ColorType::Rgba16 => "RGBA;16",
            ColorType::Rgb32F => "RGB;32F",
            ColorType::Rgba32F => "RGBA;32F",
            _ => "unknown",
        }
    }
}

/// Renders the one-line summary stored as the record description.
impl Display for ImageProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Resolution: {}x{}, Format: {}, Mode: {}",
            self.width,
            self.height,
            self.format_label(),
            self.mode_label(),
        )
    }
}

/// Decode the file at `path` and report its actual properties.
///
/// Failures are expected in normal operation (servers routinely hand back
/// HTML error pages or truncated bodies with a 200 status), so callers treat
/// an `Err` as "no metadata", not as a reason to abort.
pub fn probe(path: impl AsRef<Path>) -> Result<ImageProfile> {
    let reader = ImageReader::open(path.as_ref())
        .map_err(ErrorKind::Io)?
        // Sniff magic bytes instead of trusting the file extension; the
        // extension came from an arbitrary URL.
        .with_guessed_format()
        .map_err(ErrorKind::Io)?;
    let format = reader.format();
    let decoded = reader.decode().or_raise(|| ErrorKind::Decode)?;
    let (width, height) = decoded.dimensions();
    Ok(ImageProfile { width, height, format, color: decoded.color() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    /// Encode a tiny image in-memory and write it out as a test fixture.
    fn png_fixture(dir: &Path, width: u32, height: u32) -> std::path::PathBuf {
        let mut bytes = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        let path = dir.join("fixture.png");
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_probe_reads_dimensions_format_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = png_fixture(dir.path(), 2, 3);
        let profile = probe(&path).unwrap();
        assert_eq!(profile.width, 2);
        assert_eq!(profile.height, 3);
        assert_eq!(profile.format, Some(ImageFormat::Png));
        assert_eq!(profile.color, ColorType::Rgb8);
    }

    #[test]
    fn test_probe_ignores_a_lying_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = png_fixture(dir.path(), 4, 4);
        // PNG bytes behind a .jpg name: content wins.
        let disguised = dir.path().join("fixture.jpg");
        std::fs::copy(&png, &disguised).unwrap();
        let profile = probe(&disguised).unwrap();
        assert_eq!(profile.format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_summary_line() {
        let profile = ImageProfile {
            width: 640,
            height: 480,
            format: Some(ImageFormat::Jpeg),
            color: ColorType::Rgb8,
        };
        assert_eq!(profile.to_string(), "Resolution: 640x480, Format: JPEG, Mode: RGB");
    }

    #[test]
    fn test_zero_byte_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        let err = probe(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Decode));
    }

    #[test]
    fn test_html_error_page_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notfound.png");
        std::fs::write(&path, b"<html><body>404 Not Found</body></html>").unwrap();
        assert!(probe(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = probe(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }
}
