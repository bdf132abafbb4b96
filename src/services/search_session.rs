use std::sync::Arc;

use crate::paging::CancelToken;
use crate::remote::RemoteNewsSource;
use crate::services::news_repository::{NewsFeed, NewsRepository};
use crate::storage::traits::ArticleStore;

struct ActiveSearch<R: RemoteNewsSource + ?Sized> {
    query: String,
    feed: Arc<NewsFeed<R>>,
    cancel: CancelToken,
}

/// The query being typed and the feed of the last search that was run.
///
/// Starting a new search cancels whatever the previous feed was loading.
pub struct SearchSession<R: RemoteNewsSource + ?Sized> {
    sources: Vec<String>,
    query: String,
    active: Option<ActiveSearch<R>>,
}

impl<R: RemoteNewsSource + ?Sized + 'static> SearchSession<R> {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            query: String::new(),
            active: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn update_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Replace the current feed with one for the current query.
    /// Returns `None` and drops the old feed when the query is blank.
    pub fn search<S: ArticleStore>(
        &mut self,
        repository: &NewsRepository<R, S>,
    ) -> Option<Arc<NewsFeed<R>>> {
        if let Some(previous) = self.active.take() {
            tracing::debug!(query = %previous.query, "cancelling previous search");
            previous.cancel.cancel();
        }

        let query = self.query.trim();
        if query.is_empty() {
            return None;
        }

        let feed = Arc::new(repository.search(query, &self.sources));
        self.active = Some(ActiveSearch {
            query: query.to_string(),
            feed: feed.clone(),
            cancel: CancelToken::new(),
        });
        Some(feed)
    }

    pub fn feed(&self) -> Option<Arc<NewsFeed<R>>> {
        self.active.as_ref().map(|active| active.feed.clone())
    }

    /// Token for loads on the current feed; cancelled once it is replaced.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.active.as_ref().map(|active| active.cancel.clone())
    }

    /// The query the current feed was built for.
    pub fn active_query(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.query.as_str())
    }
}
