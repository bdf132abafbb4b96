use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{NewsError, NewsResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    author TEXT,
    content TEXT,
    description TEXT,
    published_at TEXT,
    source TEXT NOT NULL,
    title TEXT,
    url_to_image TEXT,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> NewsResult<Self> {
        Self::with_schema(Connection::open(path)?)
    }

    pub fn in_memory() -> NewsResult<Self> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(conn: Connection) -> NewsResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Lock the shared connection. Writers publish under this lock, so holding
    /// it also orders bookmark notifications.
    pub fn connection(&self) -> NewsResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| NewsError::Storage(rusqlite::Error::InvalidQuery))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(storage: &SqliteStorage, name: &str) -> bool {
        let conn = storage.connection().unwrap();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_create_in_memory_storage() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(table_exists(&storage, "bookmarks"));
        assert!(table_exists(&storage, "preferences"));
    }

    #[test]
    fn test_reopen_file_storage_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("news.db");

        SqliteStorage::new(&path).unwrap();
        let reopened = SqliteStorage::new(&path).unwrap();
        assert!(table_exists(&reopened, "bookmarks"));
    }
}
