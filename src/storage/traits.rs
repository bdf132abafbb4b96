use tokio::sync::watch;

use crate::domain::Article;
use crate::errors::NewsResult;

/// Live, latest-value-wins view of every bookmarked article in insertion order.
pub type ArticleStream = watch::Receiver<Vec<Article>>;

#[cfg_attr(test, mockall::automock)]
pub trait ArticleStore: Send + Sync {
    /// Insert the article or replace the record stored under the same url.
    fn upsert(&self, article: &Article) -> NewsResult<()>;
    /// Remove the record for `url`; absent urls are not an error.
    fn delete(&self, url: &str) -> NewsResult<()>;
    fn get_by_url(&self, url: &str) -> NewsResult<Option<Article>>;
    fn get_all(&self) -> NewsResult<ArticleStream>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    /// Whether onboarding has been completed.
    fn read_app_entry(&self) -> NewsResult<bool>;
    fn save_app_entry(&self) -> NewsResult<()>;
}
