use serde::Deserialize;

/// One image search result as delivered by a provider.
///
/// Only `image` is guaranteed; everything else is best-effort. DuckDuckGo in
/// particular never fills `description`, `file_type` or `file_size`, but the
/// fields stay on the record because a provider *may* declare them and the
/// store keeps whatever was declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// URL of the full-size image
    pub image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Dimensions as declared by the provider
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file_type: String,
    /// Declared size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Page the image was found on
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}
