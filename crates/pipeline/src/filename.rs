//! Destination file naming.
//!
//! Every downloaded image lands under a deterministic, collision-resistant
//! name: `{sanitized_title}_{timestamp}_{id}{extension}`. The sanitized
//! fragment alone guarantees nothing (empty titles are legal and collapse
//! to underscores); uniqueness comes from the store-assigned id, which is
//! why records are persisted before their name is computed.

use std::ffi::OsStr;
use std::path::Path;
use time::OffsetDateTime;

/// Maximum length of the sanitized title fragment, in characters.
const MAX_FRAGMENT_CHARS: usize = 50;

/// Derives a filesystem-safe fragment from a result title.
///
/// Lowercases the title, replaces every character outside `[a-z0-9]` with a
/// single underscore (runs are kept, not collapsed), and truncates to
/// [`MAX_FRAGMENT_CHARS`] characters. Idempotent: sanitizing an already
/// sanitized fragment changes nothing.
pub fn sanitize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| match c.is_ascii_lowercase() || c.is_ascii_digit() {
            true => c,
            false => '_',
        })
        .take(MAX_FRAGMENT_CHARS)
        .collect()
}

/// Extension (with leading dot) taken from a URL's path component, or empty.
///
/// The query string never contributes: `http://x/y.jpg?session=1` yields
/// `".jpg"`. An unparseable URL yields the empty string; collection keeps
/// whatever the provider handed over, and a missing extension just produces
/// an extensionless file.
pub(crate) fn extension_from_url(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return String::new();
    };
    Path::new(parsed.path())
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Current wall-clock time (UTC) at second granularity, 14 digits.
pub(crate) fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
    )
}

/// Assembles the destination file name for a record.
pub(crate) fn destination_name(fragment: &str, timestamp: &str, id: i64, extension: &str) -> String {
    format!("{fragment}_{timestamp}_{id}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World!", "hello_world_")]
    #[case("already_sane_123", "already_sane_123")]
    #[case("MiXeD CaSe", "mixed_case")]
    #[case("", "")]
    #[case("!!!", "___")]
    #[case("Ünïcödé béak", "_n_c_d__b_ak")]
    fn test_sanitize(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(sanitize_title(title), expected);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for title in ["Hello World!", "", "Ünïcödé béak", "a".repeat(200).as_str()] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once);
        }
    }

    #[test]
    fn test_sanitize_output_alphabet_and_length() {
        let long_and_messy = "The QUICK brown fox!? jumps over 13 lazy dogs… repeatedly, forever and ever";
        let fragment = sanitize_title(long_and_messy);
        assert_eq!(fragment.chars().count(), 50);
        assert!(fragment.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }

    #[rstest]
    #[case("http://x/y.jpg", ".jpg")]
    #[case("http://x/y.jpeg?width=1024&session=abc", ".jpeg")]
    #[case("https://cdn.example.com/a/b/c.PNG", ".PNG")]
    #[case("http://x/no-extension", "")]
    #[case("http://x/", "")]
    #[case("http://x/archive.tar.gz", ".gz")]
    #[case("not a url at all", "")]
    fn test_extension_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(extension_from_url(url), expected);
    }

    #[test]
    fn test_timestamp_is_fourteen_digits() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_destination_name() {
        assert_eq!(
            destination_name("hello_world_", "20240101120000", 42, ".jpg"),
            "hello_world__20240101120000_42.jpg"
        );
        // No extension from the URL leaves the name extensionless.
        assert_eq!(destination_name("x", "20240101120000", 1, ""), "x_20240101120000_1");
    }
}
