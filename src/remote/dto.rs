use serde::Deserialize;

use crate::domain::{Article, PageResult, Source};

#[derive(Debug, Default, Deserialize)]
pub struct SourceDto {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub author: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<SourceDto>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub articles: Option<Vec<ArticleDto>>,
    pub status: Option<String>,
    pub total_results: Option<usize>,
    // Present on error payloads only
    pub code: Option<String>,
    pub message: Option<String>,
}

impl NewsResponse {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    pub fn error_message(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "request failed".to_string(),
        }
    }

    pub fn into_page_result(self) -> PageResult {
        PageResult {
            articles: self
                .articles
                .unwrap_or_default()
                .into_iter()
                .map(ArticleDto::into_article)
                .collect(),
            total_results: self.total_results.unwrap_or(0),
        }
    }
}

impl SourceDto {
    pub fn into_source(self) -> Source {
        Source {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
        }
    }
}

impl ArticleDto {
    pub fn into_article(self) -> Article {
        Article {
            author: self.author.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            source: self.source.map(SourceDto::into_source).unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            url_to_image: self.url_to_image.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "status": "ok",
            "totalResults": 25,
            "articles": [{
                "source": {"id": "bbc-news", "name": "BBC News"},
                "author": "BBC News",
                "title": "Headline",
                "description": "Summary",
                "url": "https://www.bbc.co.uk/news/1",
                "urlToImage": "https://ichef.bbci.co.uk/1.jpg",
                "publishedAt": "2024-05-01T10:00:00Z",
                "content": "Body [+1200 chars]"
            }]
        }"#;

        let response: NewsResponse = serde_json::from_str(json).unwrap();
        assert!(!response.is_error());

        let page = response.into_page_result();
        assert_eq!(page.total_results, 25);
        assert_eq!(page.articles.len(), 1);

        let article = &page.articles[0];
        assert_eq!(article.source, Source::new("bbc-news", "BBC News"));
        assert_eq!(article.url_to_image, "https://ichef.bbci.co.uk/1.jpg");
        assert_eq!(article.published_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_null_and_missing_fields_default_to_empty() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1,
            "articles": [{
                "source": {"id": null, "name": "Reuters"},
                "author": null,
                "title": "Only a title",
                "url": "https://example.com/x"
            }, {
                "title": "No source"
            }]
        }"#;

        let page = serde_json::from_str::<NewsResponse>(json)
            .unwrap()
            .into_page_result();

        let first = &page.articles[0];
        assert_eq!(first.author, "");
        assert_eq!(first.content, "");
        assert_eq!(first.source, Source::new("", "Reuters"));

        let second = &page.articles[1];
        assert_eq!(second.source, Source::default());
        assert_eq!(second.url, "");
    }

    #[test]
    fn test_error_payload() {
        let json = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let response: NewsResponse = serde_json::from_str(json).unwrap();

        assert!(response.is_error());
        assert_eq!(response.error_message(), "apiKeyInvalid: Your API key is invalid.");
        assert!(response.into_page_result().articles.is_empty());
    }
}
