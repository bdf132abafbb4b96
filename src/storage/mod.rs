pub mod traits;
pub mod record;
pub mod sqlite;

pub use traits::{ArticleStore, ArticleStream, PreferenceStore};
pub use record::BookmarkRecord;
pub use sqlite::{SqliteArticleStore, SqlitePreferenceStore, SqliteStorage};
