use super::Article;

/// One request against the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub query: Option<String>,
    pub sources: Vec<String>,
}

impl PageRequest {
    pub fn new(page: u32, sources: &[String]) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(sources.len());
        for source in sources {
            if !unique.contains(source) {
                unique.push(source.clone());
            }
        }

        Self {
            page,
            query: None,
            sources: unique,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sources in the comma separated form the API expects.
    pub fn joined_sources(&self) -> String {
        self.sources.join(",")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub articles: Vec<Article>,
    pub total_results: usize,
}

/// A loaded page as kept by the paging engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub articles: Vec<Article>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_drops_duplicate_sources() {
        let sources = vec![
            "bbc-news".to_string(),
            "abc-news".to_string(),
            "bbc-news".to_string(),
        ];
        let request = PageRequest::new(1, &sources);

        assert_eq!(request.sources, vec!["bbc-news", "abc-news"]);
        assert_eq!(request.joined_sources(), "bbc-news,abc-news");
        assert!(request.query.is_none());
    }

    #[test]
    fn test_page_request_with_query() {
        let request = PageRequest::new(3, &["bbc-news".to_string()]).with_query("rust");
        assert_eq!(request.page, 3);
        assert_eq!(request.query.as_deref(), Some("rust"));
    }
}
