use crate::error::Result;
use crate::hit::SearchHit;
use async_trait::async_trait;

/// Unified interface for image search providers.
///
/// A provider is a black box: keyword in, finite (non-streaming) list of
/// results out. Callers iterate the list once in delivered order and must
/// not rely on any stronger ordering guarantee.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Name of the provider (used for logging only).
    fn name(&self) -> &str;

    /// Fetch every available result for the keyword.
    ///
    /// There is no result cap; implementations follow their own pagination
    /// until the provider stops returning more.
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>>;
}

/// Canned-result provider for testing.
///
/// Returns the same hits for every keyword and records the keywords it was
/// asked about, so tests can assert on both sides of the exchange without a
/// network dependency.
#[cfg(feature = "mock")]
pub struct MockProvider {
    hits: Vec<SearchHit>,
    queries: std::sync::Mutex<Vec<String>>,
}

#[cfg(feature = "mock")]
impl MockProvider {
    /// Create a mock provider pre-populated with results.
    pub fn with_hits(hits: impl IntoIterator<Item = SearchHit>) -> Self {
        Self {
            hits: hits.into_iter().collect(),
            queries: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The keywords this provider has been queried with, in order.
    ///
    /// Panics on a poisoned lock. The panic here is DELIBERATE: this type is
    /// intended for tests, where panicking is the correct failure mode.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[cfg(feature = "mock")]
#[async_trait]
impl SearchProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        self.queries.lock().unwrap().push(keyword.to_string());
        Ok(self.hits.clone())
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_hits_and_records_queries() {
        let provider = MockProvider::with_hits([SearchHit {
            image: "http://x/y.jpg".to_string(),
            title: "Hello World!".to_string(),
            ..Default::default()
        }]);
        let hits = provider.search("test").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].image, "http://x/y.jpg");
        assert_eq!(provider.queries(), vec!["test".to_string()]);
    }
}
