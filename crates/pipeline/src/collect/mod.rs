//! Metadata collection: search results in, pending image records out.
//!
//! For every result the provider returns, a record is inserted *before* its
//! destination file name is computed: the name embeds the store-assigned
//! id, so the insert has to happen first. No bytes are fetched here; the
//! record is born pending (`retrieved = false`) and stays that way until a
//! download run gets to it.

pub mod error;

use crate::collect::error::{ErrorKind, Result as CollectResult};
use crate::error::{ErrorKind as PipelineErrorKind, Result};
use crate::filename::{destination_name, extension_from_url, sanitize_title, timestamp};
use exn::ResultExt;
use magpie_cache::{NewImage, Repository};
use magpie_search::{SearchHit, SearchProvider};
use tracing::instrument;

/// Summary of one collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    /// Number of results the provider returned; one record was created for
    /// each of them.
    pub discovered: usize,
}

/// Query the provider for `keyword` and persist one record per result.
///
/// Every supplied tag name is attached (whitespace-trimmed) to every new
/// record. Fail-fast: a provider or store error aborts the run and
/// propagates; there is no partial-result recovery beyond the records
/// already committed.
#[instrument(skip(provider, repo, tags), fields(provider = provider.name()))]
pub async fn collect_metadata(
    provider: &dyn SearchProvider,
    repo: &Repository,
    keyword: &str,
    tags: &[String],
) -> Result<Collected> {
    collect_inner(provider, repo, keyword, tags).await.or_raise(|| PipelineErrorKind::Collect)
}

async fn collect_inner(
    provider: &dyn SearchProvider,
    repo: &Repository,
    keyword: &str,
    tags: &[String],
) -> CollectResult<Collected> {
    let hits = provider.search(keyword).await.or_raise(|| ErrorKind::Search)?;
    tracing::info!(count = hits.len(), keyword, "recording search results");
    for hit in &hits {
        record_hit(repo, hit, tags).await?;
    }
    Ok(Collected { discovered: hits.len() })
}

async fn record_hit(repo: &Repository, hit: &SearchHit, tags: &[String]) -> CollectResult<()> {
    let image = NewImage {
        url: hit.image.clone(),
        title: hit.title.clone(),
        description: hit.description.clone(),
        width: hit.width,
        height: hit.height,
        file_type: hit.file_type.clone(),
        file_size: hit.file_size,
    };
    let id = repo.insert(&image).await.or_raise(|| ErrorKind::Cache)?;
    let name = destination_name(
        &sanitize_title(&hit.title),
        &timestamp(),
        id,
        &extension_from_url(&hit.image),
    );
    repo.set_file_name(id, &name).await.or_raise(|| ErrorKind::Cache)?;
    for tag in tags {
        repo.attach_tag(id, tag.trim()).await.or_raise(|| ErrorKind::Cache)?;
    }
    tracing::debug!(id, name = %name, "recorded search result");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use magpie_cache::Database;
    use magpie_search::MockProvider;
    use regex::Regex;

    fn hit(image: &str, title: &str) -> SearchHit {
        SearchHit {
            image: image.to_string(),
            title: title.to_string(),
            description: "provider text".to_string(),
            width: Some(800),
            height: Some(600),
            ..Default::default()
        }
    }

    async fn repo() -> (Database, Repository) {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        (db, repo)
    }

    #[tokio::test]
    async fn test_one_record_per_result_all_pending() {
        let (db, repo) = repo().await;
        let provider = MockProvider::with_hits([
            hit("http://x/a.jpg", "A"),
            hit("http://x/b.jpg", "B"),
            hit("http://x/c.png", "C"),
        ]);
        let report = collect_metadata(&provider, &repo, "birds", &[]).await.unwrap();
        assert_eq!(report.discovered, 3);
        assert_eq!(provider.queries(), vec!["birds".to_string()]);
        let pending = repo.list_pending().await.unwrap();
        assert_eq!(pending.len(), 3);
        for record in &pending {
            assert!(!record.retrieved);
            // The computed name embeds the record's own id.
            assert!(record.file_name.contains(&format!("_{}", record.id)));
        }
        db.close().await;
    }

    #[tokio::test]
    async fn test_end_to_end_naming_and_tagging() {
        let (db, repo) = repo().await;
        let provider = MockProvider::with_hits([SearchHit {
            image: "http://x/y.jpg".to_string(),
            title: "Hello World!".to_string(),
            ..Default::default()
        }]);
        let tags = vec!["a".to_string(), "b".to_string()];
        collect_metadata(&provider, &repo, "test", &tags).await.unwrap();

        let pending = repo.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        let record = &pending[0];
        let pattern = Regex::new(r"^hello_world__\d{14}_\d+\.jpg$").unwrap();
        assert!(
            pattern.is_match(&record.file_name),
            "unexpected file name: {}",
            record.file_name
        );
        let tag_names: Vec<String> =
            repo.tags_for(record.id).await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(tag_names, vec!["a".to_string(), "b".to_string()]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_tag_names_are_trimmed() {
        let (db, repo) = repo().await;
        let provider = MockProvider::with_hits([hit("http://x/a.jpg", "A")]);
        let tags = vec!["  cats ".to_string()];
        collect_metadata(&provider, &repo, "cats", &tags).await.unwrap();
        let record = &repo.list_pending().await.unwrap()[0];
        let names: Vec<String> = repo.tags_for(record.id).await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["cats".to_string()]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_provider_fields_are_copied_verbatim() {
        let (db, repo) = repo().await;
        let provider = MockProvider::with_hits([hit("http://x/a.jpg", "A starling")]);
        collect_metadata(&provider, &repo, "starlings", &[]).await.unwrap();
        let record = &repo.list_pending().await.unwrap()[0];
        assert_eq!(record.url, "http://x/a.jpg");
        assert_eq!(record.title, "A starling");
        assert_eq!(record.description, "provider text");
        assert_eq!(record.width, Some(800));
        assert_eq!(record.height, Some(600));
        db.close().await;
    }

    #[tokio::test]
    async fn test_empty_result_set_is_fine() {
        let (db, repo) = repo().await;
        let provider = MockProvider::with_hits([]);
        let report = collect_metadata(&provider, &repo, "nothing", &[]).await.unwrap();
        assert_eq!(report.discovered, 0);
        assert!(repo.list_pending().await.unwrap().is_empty());
        db.close().await;
    }
}
