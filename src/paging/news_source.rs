use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Article, Page, PageRequest};
use crate::errors::NewsResult;
use crate::paging::source::PagingSource;
use crate::remote::RemoteNewsSource;

/// What a feed is paging over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    Browse { sources: Vec<String> },
    Search { query: String, sources: Vec<String> },
}

impl FeedQuery {
    pub fn request(&self, page: u32) -> PageRequest {
        match self {
            FeedQuery::Browse { sources } => PageRequest::new(page, sources),
            FeedQuery::Search { query, sources } => {
                PageRequest::new(page, sources).with_query(query.clone())
            }
        }
    }
}

/// Pages through `/everything` for either browse or search.
pub struct NewsPagingSource<R: RemoteNewsSource + ?Sized> {
    remote: Arc<R>,
    query: FeedQuery,
    /// Raw article count across successful loads, before deduplication.
    total_fetched: AtomicUsize,
}

impl<R: RemoteNewsSource + ?Sized> NewsPagingSource<R> {
    pub fn new(remote: Arc<R>, query: FeedQuery) -> Self {
        Self {
            remote,
            query,
            total_fetched: AtomicUsize::new(0),
        }
    }

    pub fn query(&self) -> &FeedQuery {
        &self.query
    }

    pub fn total_fetched(&self) -> usize {
        self.total_fetched.load(Ordering::SeqCst)
    }
}

/// Keep the first article for each title. Only applied within one page.
fn distinct_by_title(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.title.clone()))
        .collect()
}

#[async_trait]
impl<R: RemoteNewsSource + ?Sized> PagingSource for NewsPagingSource<R> {
    async fn load(&self, key: Option<u32>) -> NewsResult<Page> {
        let page = key.unwrap_or(1);
        let result = self.remote.fetch_page(&self.query.request(page)).await?;

        let total = self.total_fetched.fetch_add(result.articles.len(), Ordering::SeqCst)
            + result.articles.len();
        let has_next_page = total != result.total_results;

        Ok(Page {
            articles: distinct_by_title(result.articles),
            prev_key: None,
            next_key: if has_next_page { Some(page + 1) } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageResult;
    use crate::errors::NewsError;
    use crate::remote::traits::MockRemoteNewsSource;

    fn articles(prefix: &str, count: usize) -> Vec<Article> {
        (0..count)
            .map(|i| Article::new(format!("{}-{}", prefix, i), format!("{} title {}", prefix, i)))
            .collect()
    }

    fn sources() -> Vec<String> {
        vec!["bbc-news".to_string()]
    }

    #[tokio::test]
    async fn test_paging_through_twenty_five_results() {
        let mut remote = MockRemoteNewsSource::new();
        remote.expect_fetch_page().returning(|request| {
            let count = if request.page < 3 { 10 } else { 5 };
            Ok(PageResult {
                articles: articles(&format!("p{}", request.page), count),
                total_results: 25,
            })
        });

        let source = NewsPagingSource::new(
            Arc::new(remote),
            FeedQuery::Browse { sources: sources() },
        );

        let first = source.load(None).await.unwrap();
        assert_eq!(first.articles.len(), 10);
        assert_eq!(first.next_key, Some(2));
        assert_eq!(first.prev_key, None);

        let second = source.load(Some(2)).await.unwrap();
        assert_eq!(second.next_key, Some(3));
        assert_eq!(source.total_fetched(), 20);

        let third = source.load(Some(3)).await.unwrap();
        assert_eq!(third.articles.len(), 5);
        assert_eq!(third.next_key, None);
    }

    #[tokio::test]
    async fn test_dedup_within_page_counts_raw_articles() {
        let mut remote = MockRemoteNewsSource::new();
        remote.expect_fetch_page().returning(|_| {
            Ok(PageResult {
                articles: vec![
                    Article::new("a", "Same headline"),
                    Article::new("b", "Same headline"),
                    Article::new("c", "Other headline"),
                ],
                total_results: 3,
            })
        });

        let source = NewsPagingSource::new(
            Arc::new(remote),
            FeedQuery::Browse { sources: sources() },
        );
        let page = source.load(None).await.unwrap();

        // First occurrence wins
        let urls: Vec<&str> = page.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c"]);
        // Pre-dedup count reached the total
        assert_eq!(page.next_key, None);
    }

    #[tokio::test]
    async fn test_duplicate_titles_across_pages_are_kept() {
        let mut remote = MockRemoteNewsSource::new();
        remote.expect_fetch_page().returning(|request| {
            Ok(PageResult {
                articles: vec![Article::new(format!("u{}", request.page), "Wire story")],
                total_results: 2,
            })
        });

        let source = NewsPagingSource::new(
            Arc::new(remote),
            FeedQuery::Browse { sources: sources() },
        );
        let first = source.load(None).await.unwrap();
        let second = source.load(first.next_key).await.unwrap();

        assert_eq!(first.articles[0].title, "Wire story");
        assert_eq!(second.articles[0].title, "Wire story");
        assert_eq!(second.next_key, None);
    }

    #[tokio::test]
    async fn test_search_passes_query_and_sources() {
        let mut remote = MockRemoteNewsSource::new();
        remote
            .expect_fetch_page()
            .withf(|request| {
                request.page == 1
                    && request.query.as_deref() == Some("elections")
                    && request.joined_sources() == "bbc-news,abc-news"
            })
            .times(1)
            .returning(|_| Ok(PageResult::default()));

        let source = NewsPagingSource::new(
            Arc::new(remote),
            FeedQuery::Search {
                query: "elections".to_string(),
                sources: vec!["bbc-news".to_string(), "abc-news".to_string()],
            },
        );

        let page = source.load(None).await.unwrap();
        assert!(page.articles.is_empty());
        assert_eq!(page.next_key, None);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_counter_untouched() {
        let mut remote = MockRemoteNewsSource::new();
        remote
            .expect_fetch_page()
            .returning(|_| Err(NewsError::Connectivity("refused".to_string())));

        let source = NewsPagingSource::new(
            Arc::new(remote),
            FeedQuery::Browse { sources: sources() },
        );

        assert!(source.load(None).await.is_err());
        assert_eq!(source.total_fetched(), 0);
    }
}
