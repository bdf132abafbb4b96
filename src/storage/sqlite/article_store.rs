use rusqlite::{Connection, Row};
use tokio::sync::watch;

use crate::domain::Article;
use crate::errors::{NewsError, NewsResult};
use crate::storage::record::BookmarkRecord;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{ArticleStore, ArticleStream};

const SELECT_COLUMNS: &str =
    "SELECT author, content, description, published_at, source, title, url, url_to_image FROM bookmarks";

pub struct SqliteArticleStore {
    storage: SqliteStorage,
    articles: watch::Sender<Vec<Article>>,
}

impl SqliteArticleStore {
    pub fn new(storage: SqliteStorage) -> NewsResult<Self> {
        let initial = {
            let conn = storage.connection()?;
            load_all(&conn)?
        };
        let (articles, _) = watch::channel(initial);

        Ok(Self { storage, articles })
    }

    /// Publish the table as re-read inside the write's transaction. Called
    /// with the connection lock still held so that emissions follow write order.
    fn publish(&self, all: Vec<Article>) {
        tracing::debug!(count = all.len(), "publishing bookmarks");
        self.articles.send_replace(all);
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<BookmarkRecord> {
    let text = |i: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(i)?.unwrap_or_default())
    };

    Ok(BookmarkRecord {
        author: text(0)?,
        content: text(1)?,
        description: text(2)?,
        published_at: text(3)?,
        source: text(4)?,
        title: text(5)?,
        url: text(6)?,
        url_to_image: text(7)?,
    })
}

fn load_all(conn: &Connection) -> NewsResult<Vec<Article>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
    let records = stmt.query_map([], row_to_record)?;

    let articles = records
        .map(|r| r.map(BookmarkRecord::into_article))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(articles)
}

impl ArticleStore for SqliteArticleStore {
    fn upsert(&self, article: &Article) -> NewsResult<()> {
        let record = BookmarkRecord::from_article(article);
        let mut conn = self.storage.connection()?;
        // The write only commits if the table can be read back for the live view
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO bookmarks (url, author, content, description, published_at, source, title, url_to_image) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            (
                &record.url,
                &record.author,
                &record.content,
                &record.description,
                &record.published_at,
                &record.source,
                &record.title,
                &record.url_to_image,
            ),
        )?;
        let all = load_all(&tx)?;
        tx.commit()?;
        tracing::debug!(url = %record.url, "bookmark saved");

        self.publish(all);
        Ok(())
    }

    fn delete(&self, url: &str) -> NewsResult<()> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM bookmarks WHERE url = ?1", [url])?;
        if removed == 0 {
            return Ok(());
        }
        let all = load_all(&tx)?;
        tx.commit()?;
        tracing::debug!(url, "bookmark deleted");

        self.publish(all);
        Ok(())
    }

    fn get_by_url(&self, url: &str) -> NewsResult<Option<Article>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("{} WHERE url = ?1", SELECT_COLUMNS))?;

        match stmt.query_row([url], row_to_record) {
            Ok(record) => Ok(Some(record.into_article())),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(NewsError::from(e)),
        }
    }

    fn get_all(&self) -> NewsResult<ArticleStream> {
        Ok(self.articles.subscribe())
    }
}
