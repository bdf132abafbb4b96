use crate::errors::{NewsError, NewsResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::PreferenceStore;

const APP_ENTRY: &str = "appEntry";

pub struct SqlitePreferenceStore {
    storage: SqliteStorage,
}

impl SqlitePreferenceStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn read_app_entry(&self) -> NewsResult<bool> {
        let conn = self.storage.connection()?;
        let value = conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            [APP_ENTRY],
            |row| row.get::<_, String>(0),
        );

        match value {
            Ok(v) => Ok(v == "true"),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(NewsError::from(e)),
        }
    }

    fn save_app_entry(&self) -> NewsResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, 'true')",
            [APP_ENTRY],
        )?;
        Ok(())
    }
}
