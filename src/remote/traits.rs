use async_trait::async_trait;

use crate::domain::{PageRequest, PageResult};
use crate::errors::NewsResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteNewsSource: Send + Sync {
    /// Fetch a single page. No retries and no caching happen at this layer.
    async fn fetch_page(&self, request: &PageRequest) -> NewsResult<PageResult>;
}
