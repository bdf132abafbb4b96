use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::domain::{PageRequest, PageResult};
use crate::errors::{NewsError, NewsResult};
use crate::remote::dto::NewsResponse;
use crate::remote::traits::RemoteNewsSource;

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(config: &Config) -> NewsResult<Self> {
        let api_key = config.require_api_key()?.to_string();

        Ok(Self {
            client: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Build the `/everything` URL for a request
    fn build_url(&self, request: &PageRequest) -> NewsResult<Url> {
        let endpoint = format!("{}/everything", self.base_url.trim_end_matches('/'));
        let mut url = Url::parse(&endpoint)
            .map_err(|e| NewsError::Config(format!("Invalid NEWS_API_BASE_URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = &request.query {
                pairs.append_pair("q", query);
            }
            pairs
                .append_pair("sources", &request.joined_sources())
                .append_pair("page", &request.page.to_string())
                .append_pair("apiKey", &self.api_key);
        }

        Ok(url)
    }
}

#[async_trait]
impl RemoteNewsSource for NewsApiClient {
    async fn fetch_page(&self, request: &PageRequest) -> NewsResult<PageResult> {
        let url = self.build_url(request)?;
        tracing::debug!(
            page = request.page,
            sources = %request.joined_sources(),
            query = request.query.as_deref().unwrap_or(""),
            "fetching news page"
        );

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error bodies usually carry a code and message worth surfacing
            let message = serde_json::from_str::<NewsResponse>(&body)
                .map(|r| r.error_message())
                .unwrap_or_else(|_| status.to_string());
            return Err(NewsError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed: NewsResponse = serde_json::from_str(&body)?;
        if parsed.is_error() {
            return Err(NewsError::api(parsed.error_message()));
        }

        Ok(parsed.into_page_result())
    }
}
