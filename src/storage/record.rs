use crate::domain::{Article, Source};

/// Row layout of the `bookmarks` table.
///
/// The source is kept in a single `"<id>,<name>"` column so that bookmark
/// databases written by earlier clients stay readable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub author: String,
    pub content: String,
    pub description: String,
    pub published_at: String,
    pub source: String,
    pub title: String,
    pub url: String,
    pub url_to_image: String,
}

impl BookmarkRecord {
    pub fn from_article(article: &Article) -> Self {
        Self {
            author: article.author.clone(),
            content: article.content.clone(),
            description: article.description.clone(),
            published_at: article.published_at.clone(),
            source: flatten_source(&article.source),
            title: article.title.clone(),
            url: article.url.clone(),
            url_to_image: article.url_to_image.clone(),
        }
    }

    pub fn into_article(self) -> Article {
        Article {
            author: self.author,
            content: self.content,
            description: self.description,
            published_at: self.published_at,
            source: parse_source(&self.source),
            title: self.title,
            url: self.url,
            url_to_image: self.url_to_image,
        }
    }
}

pub fn flatten_source(source: &Source) -> String {
    format!("{},{}", source.id, source.name)
}

/// Anything other than exactly one comma decodes to an empty source.
pub fn parse_source(flattened: &str) -> Source {
    let parts: Vec<&str> = flattened.split(',').collect();
    match parts.as_slice() {
        [id, name] => Source::new(*id, *name),
        _ => Source::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str) -> BookmarkRecord {
        BookmarkRecord {
            author: "Jane Doe".to_string(),
            content: "Body".to_string(),
            description: "Summary".to_string(),
            published_at: "2024-05-01T10:00:00Z".to_string(),
            source: source.to_string(),
            title: "Headline".to_string(),
            url: "https://example.com/a".to_string(),
            url_to_image: "https://example.com/a.jpg".to_string(),
        }
    }

    #[test]
    fn test_record_round_trip_with_one_comma() {
        for source in ["bbc-news,BBC News", ",Reuters", "id,", ","] {
            let original = record(source);
            let restored = BookmarkRecord::from_article(&original.clone().into_article());
            assert_eq!(restored, original, "source {:?} should round trip", source);
        }
    }

    #[test]
    fn test_parse_source_splits_id_and_name() {
        assert_eq!(parse_source("bbc-news,BBC News"), Source::new("bbc-news", "BBC News"));
    }

    #[test]
    fn test_malformed_source_decodes_to_empty() {
        assert_eq!(parse_source("no comma here"), Source::default());
        assert_eq!(parse_source(""), Source::default());
        assert_eq!(parse_source("abc,ABC News, Inc"), Source::default());
    }

    #[test]
    fn test_article_to_record_flattens_source() {
        let article = Article::new("https://example.com/a", "Headline")
            .with_source(Source::new("al-jazeera-english", "Al Jazeera English"));
        let record = BookmarkRecord::from_article(&article);
        assert_eq!(record.source, "al-jazeera-english,Al Jazeera English");
        assert_eq!(record.into_article(), article);
    }
}
