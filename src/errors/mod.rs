use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Network errors
    #[error("Request timed out: {0}")]
    Network(String),

    #[error("Server unreachable: {0}")]
    Connectivity(String),

    #[error("News API error{}: {message}", status_suffix(.status))]
    Api { status: Option<u16>, message: String },

    // Storage errors
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NewsError {
    pub fn api(message: impl Into<String>) -> Self {
        NewsError::Api {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NewsError::Network(_) => ErrorKind::Network,
            NewsError::Connectivity(_) => ErrorKind::Connectivity,
            NewsError::Api { .. } => ErrorKind::Api,
            NewsError::Storage(_) => ErrorKind::Storage,
            _ => ErrorKind::Other,
        }
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter
        let err = err.without_url();
        if err.is_timeout() {
            NewsError::Network(err.to_string())
        } else if err.is_connect() {
            NewsError::Connectivity(err.to_string())
        } else {
            NewsError::Api {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for NewsError {
    fn from(err: serde_json::Error) -> Self {
        NewsError::api(format!("Malformed response: {}", err))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

pub type NewsResult<T> = Result<T, NewsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Connectivity,
    Api,
    Storage,
    Other,
}

/// Cloneable view of a failed load, kept inside `LoadState::Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: ErrorKind,
    pub message: String,
}

impl LoadError {
    /// Message shown to the reader in place of the list.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::Connectivity => "Internet Unavailable.",
            ErrorKind::Network => "Server Unavailable.",
            _ => "Unknown Error.",
        }
    }
}

impl From<&NewsError> for LoadError {
    fn from(err: &NewsError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_classification() {
        let connectivity = LoadError::from(&NewsError::Connectivity("refused".to_string()));
        assert_eq!(connectivity.user_message(), "Internet Unavailable.");

        let timeout = LoadError::from(&NewsError::Network("timed out".to_string()));
        assert_eq!(timeout.user_message(), "Server Unavailable.");

        let api = LoadError::from(&NewsError::Api {
            status: Some(426),
            message: "upgrade required".to_string(),
        });
        assert_eq!(api.user_message(), "Unknown Error.");
        assert_eq!(api.kind, ErrorKind::Api);
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let err = NewsError::Api {
            status: Some(401),
            message: "apiKeyInvalid".to_string(),
        };
        assert_eq!(err.to_string(), "News API error (401): apiKeyInvalid");
        assert_eq!(NewsError::api("bad").to_string(), "News API error: bad");
    }

    #[test]
    fn test_storage_error_kind() {
        let err = NewsError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
