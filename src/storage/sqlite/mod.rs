mod connection;
mod article_store;
mod preference_store;

pub use connection::SqliteStorage;
pub use article_store::SqliteArticleStore;
pub use preference_store::SqlitePreferenceStore;
