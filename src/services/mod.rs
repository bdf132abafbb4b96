pub mod news_repository;
pub mod search_session;

pub use news_repository::{BookmarkAction, NewsFeed, NewsRepository};
pub use search_session::SearchSession;
