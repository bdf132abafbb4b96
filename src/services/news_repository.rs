use std::fmt;
use std::sync::Arc;

use crate::domain::Article;
use crate::errors::NewsResult;
use crate::paging::{FeedQuery, NewsPagingSource, PagingConfig, PagingEngine};
use crate::remote::RemoteNewsSource;
use crate::storage::traits::{ArticleStore, ArticleStream};

/// A paged feed of articles fetched from the remote API.
pub type NewsFeed<R> = PagingEngine<NewsPagingSource<R>>;

/// What `toggle_bookmark` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAction {
    Saved,
    Deleted,
}

impl fmt::Display for BookmarkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkAction::Saved => write!(f, "Article Saved"),
            BookmarkAction::Deleted => write!(f, "Article Deleted"),
        }
    }
}

/// Single entry point for remote feeds and the bookmark store.
pub struct NewsRepository<R: RemoteNewsSource + ?Sized, S: ArticleStore> {
    remote: Arc<R>,
    store: S,
    config: PagingConfig,
}

impl<R: RemoteNewsSource + ?Sized + 'static, S: ArticleStore> NewsRepository<R, S> {
    pub fn new(remote: Arc<R>, store: S, config: PagingConfig) -> Self {
        Self {
            remote,
            store,
            config,
        }
    }

    /// Everything published by `sources`, newest pages loaded on demand.
    pub fn browse(&self, sources: &[String]) -> NewsFeed<R> {
        self.feed(FeedQuery::Browse {
            sources: sources.to_vec(),
        })
    }

    /// Articles from `sources` matching `query`.
    pub fn search(&self, query: &str, sources: &[String]) -> NewsFeed<R> {
        self.feed(FeedQuery::Search {
            query: query.to_string(),
            sources: sources.to_vec(),
        })
    }

    fn feed(&self, query: FeedQuery) -> NewsFeed<R> {
        tracing::debug!(?query, "creating feed");
        let remote = self.remote.clone();
        PagingEngine::new(self.config, move || {
            NewsPagingSource::new(remote.clone(), query.clone())
        })
    }

    pub fn upsert(&self, article: &Article) -> NewsResult<()> {
        self.store.upsert(article)
    }

    pub fn delete(&self, url: &str) -> NewsResult<()> {
        self.store.delete(url)
    }

    pub fn get_by_url(&self, url: &str) -> NewsResult<Option<Article>> {
        self.store.get_by_url(url)
    }

    pub fn get_all(&self) -> NewsResult<ArticleStream> {
        self.store.get_all()
    }

    /// Save the article if it isn't bookmarked yet, otherwise remove it.
    pub fn toggle_bookmark(&self, article: &Article) -> NewsResult<BookmarkAction> {
        if self.store.get_by_url(&article.url)?.is_some() {
            self.store.delete(&article.url)?;
            Ok(BookmarkAction::Deleted)
        } else {
            self.store.upsert(article)?;
            Ok(BookmarkAction::Saved)
        }
    }
}
