//! DuckDuckGo Images client.
//!
//! DuckDuckGo has no official API. The image results are served by the same
//! unofficial endpoint the website's frontend uses: a request token (`vqd`)
//! is embedded in the HTML of the regular search page, and `i.js` then
//! returns JSON pages of results, each carrying a `next` cursor until the
//! result set is exhausted.

use crate::error::{ErrorKind, Result};
use crate::hit::SearchHit;
use crate::provider::SearchProvider;
use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::instrument;

const BASE_URL: &str = "https://duckduckgo.com";

/// Safe-search setting, mapped onto the provider's `p` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Strict,
    Moderate,
    #[default]
    Off,
}
impl SafeSearch {
    fn as_param(self) -> &'static str {
        match self {
            SafeSearch::Strict => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        }
    }
}

/// One page of `i.js` results.
#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    results: Vec<SearchHit>,
    /// Relative URL of the next page; absent on the last one.
    #[serde(default)]
    next: Option<String>,
}

/// Image search against DuckDuckGo.
///
/// Holds a pre-compiled token pattern so that a regex syntax mistake
/// surfaces at construction time rather than on the first search.
pub struct DuckDuckGo {
    client: reqwest::Client,
    region: String,
    safesearch: SafeSearch,
    token_pattern: Regex,
}

impl DuckDuckGo {
    /// Create a client for the given region (e.g. `"wt-wt"` for worldwide).
    ///
    /// The [`reqwest::Client`] is supplied by the caller so that timeout and
    /// user-agent policy live in one place for the whole program.
    pub fn new(client: reqwest::Client, region: impl Into<String>, safesearch: SafeSearch) -> Result<Self> {
        // The token is a dash-separated digit run: vqd="4-128572932…"
        // (sometimes unquoted in minified markup).
        let token_pattern = Regex::new(r#"vqd=['"]?([0-9-]+)"#).or_raise(|| ErrorKind::Token)?;
        Ok(Self {
            client,
            region: region.into(),
            safesearch,
            token_pattern,
        })
    }

    /// Fetch the HTML search page and pull the `vqd` request token out of it.
    async fn request_token(&self, keyword: &str) -> Result<String> {
        let body = self
            .client
            .get(BASE_URL)
            .query(&[("q", keyword), ("iax", "images"), ("ia", "images")])
            .send()
            .await
            .map_err(ErrorKind::Http)?
            .error_for_status()
            .map_err(ErrorKind::Http)?
            .text()
            .await
            .map_err(ErrorKind::Http)?;
        self.extract_token(&body)
    }

    fn extract_token(&self, body: &str) -> Result<String> {
        let capture = self.token_pattern.captures(body).ok_or_raise(|| ErrorKind::Token)?;
        Ok(capture[1].to_string())
    }

    async fn fetch_page(&self, url: &str, token: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .query(&[("vqd", token)])
            .send()
            .await
            .map_err(ErrorKind::Http)?
            .error_for_status()
            .map_err(ErrorKind::Http)?;
        response.json().await.or_raise(|| ErrorKind::Malformed)
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    /// Collect every page of results for the keyword.
    #[instrument(skip(self))]
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let token = self.request_token(keyword).await?;
        let first = format!(
            "{BASE_URL}/i.js?l={}&o=json&q={}&f=,,,&p={}",
            self.region,
            urlencode(keyword),
            self.safesearch.as_param(),
        );
        let mut hits = Vec::new();
        let mut url = Some(first);
        while let Some(current) = url.take() {
            let page = self.fetch_page(&current, &token).await?;
            tracing::debug!(count = page.results.len(), "received result page");
            hits.extend(page.results);
            // The cursor is relative ("i.js?q=…&s=100&…") and does not
            // include the token; fetch_page re-appends it.
            url = page.next.map(|next| format!("{BASE_URL}/{next}"));
        }
        tracing::info!(total = hits.len(), "search complete");
        Ok(hits)
    }
}

/// Percent-encode a query value. Only the characters that matter inside a
/// query string are escaped; everything unreserved passes through.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            b' ' => out.push_str("%20"),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn client() -> DuckDuckGo {
        DuckDuckGo::new(reqwest::Client::new(), "wt-wt", SafeSearch::Off).unwrap()
    }

    #[rstest]
    #[case(r#"nrje('/d.js?q=x&l=wt-wt',{vqd:"4-128572932086063"});"#, "4-128572932086063")]
    #[case(r#"vqd='4-99'"#, "4-99")]
    #[case(r#"…&vqd=4-123456&kl=wt-wt"#, "4-123456")]
    fn test_extracts_request_token(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(client().extract_token(body).unwrap(), expected);
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let err = client().extract_token("<html>no token here</html>").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Token));
    }

    #[test]
    fn test_page_parses_results_and_cursor() {
        let json = r#"{
            "results": [{"image": "http://x/a.jpg", "title": "A"}, {"image": "http://x/b.jpg"}],
            "next": "i.js?q=birds&s=100&nextParams=&v7exp=a"
        }"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.next.as_deref(), Some("i.js?q=birds&s=100&nextParams=&v7exp=a"));
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let page: Page = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
    }

    #[rstest]
    #[case(SafeSearch::Strict, "1")]
    #[case(SafeSearch::Moderate, "-1")]
    #[case(SafeSearch::Off, "-2")]
    fn test_safesearch_parameter(#[case] setting: SafeSearch, #[case] expected: &str) {
        assert_eq!(setting.as_param(), expected);
    }

    #[rstest]
    #[case("musicians with birds", "musicians%20with%20birds")]
    #[case("na\u{ef}ve", "na%C3%AFve")]
    #[case("plain", "plain")]
    fn test_urlencode(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(urlencode(input), expected);
    }
}
