pub mod traits;
pub mod dto;
pub mod news_api;

pub use traits::RemoteNewsSource;
pub use news_api::NewsApiClient;
