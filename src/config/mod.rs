use std::time::Duration;

use crate::errors::{NewsError, NewsResult};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_SOURCES: &str = "bbc-news,abc-news,al-jazeera-english";
/// Largest page the news API serves in one response.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub db_path: String,
    pub sources: Vec<String>,
    pub request_timeout: Duration,
    pub page_size: usize,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> NewsResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let api_key = std::env::var("NEWS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let base_url = std::env::var("NEWS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        // Default db_path is relative to executable directory
        let db_path = std::env::var("NEWS_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("newsdeck.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./newsdeck.db".to_string())
        });

        let sources = parse_sources(
            &std::env::var("NEWS_SOURCES").unwrap_or_else(|_| DEFAULT_SOURCES.to_string()),
        );

        let timeout_secs = parse_number("NEWS_HTTP_TIMEOUT_SECS", 30)?;
        let page_size = validate_page_size(parse_number("NEWS_PAGE_SIZE", 10)?)?;

        Ok(Self {
            api_key,
            base_url,
            db_path,
            sources,
            request_timeout: Duration::from_secs(timeout_secs as u64),
            page_size,
        })
    }

    pub fn require_api_key(&self) -> NewsResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| NewsError::MissingEnvVar("NEWS_API_KEY".to_string()))
    }
}

/// Split a comma separated source list, dropping blanks.
pub fn parse_sources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(var: &str, default: usize) -> NewsResult<usize> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| NewsError::Config(format!("{} is not a number: {}", var, value))),
        Err(_) => Ok(default),
    }
}

fn validate_page_size(page_size: usize) -> NewsResult<usize> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(NewsError::Config(format!(
            "NEWS_PAGE_SIZE must be between 1 and {}: {}",
            MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_trims_and_drops_blanks() {
        let sources = parse_sources(" bbc-news, ,abc-news ,");
        assert_eq!(sources, vec!["bbc-news", "abc-news"]);
    }

    #[test]
    fn test_default_sources() {
        let sources = parse_sources(DEFAULT_SOURCES);
        assert_eq!(sources, vec!["bbc-news", "abc-news", "al-jazeera-english"]);
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(validate_page_size(1).unwrap(), 1);
        assert_eq!(validate_page_size(MAX_PAGE_SIZE).unwrap(), MAX_PAGE_SIZE);
        assert!(matches!(validate_page_size(0), Err(NewsError::Config(_))));
        assert!(matches!(
            validate_page_size(MAX_PAGE_SIZE + 1),
            Err(NewsError::Config(_))
        ));
        assert!(matches!(
            validate_page_size(usize::MAX),
            Err(NewsError::Config(msg)) if msg.contains("NEWS_PAGE_SIZE")
        ));
    }

    #[test]
    fn test_require_api_key_missing() {
        let config = Config {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            db_path: ":memory:".to_string(),
            sources: Vec::new(),
            request_timeout: Duration::from_secs(30),
            page_size: 10,
        };

        assert!(matches!(
            config.require_api_key(),
            Err(NewsError::MissingEnvVar(var)) if var == "NEWS_API_KEY"
        ));
    }
}
