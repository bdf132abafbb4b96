pub mod cancel;
pub mod source;
pub mod news_source;
pub mod engine;

pub use cancel::CancelToken;
pub use source::{PagingSource, PagingState};
pub use news_source::{FeedQuery, NewsPagingSource};
pub use engine::{LoadOutcome, PagingConfig, PagingEngine, PagingSnapshot};
