use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{decode_articles, Endpoint, NewsProvider, NewsQuery, NewsResponse};

/// NewsAPI.org client (or any server speaking the same v2 protocol)
pub struct NewsApiClient {
    base_url: String,
    api_key: String,
    user_agent: String,
    language: String,
    chat_page_size: u32,
    timeout: Duration,
    max_retries: u32,
    client: reqwest::Client,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_agent: common::DEFAULT_USER_AGENT.to_string(),
            language: "en".to_string(),
            chat_page_size: 5,
            timeout: Duration::from_secs(10),
            max_retries: 3,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_defaults(mut self, timeout_secs: u64, max_retries: u32) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_chat_defaults(mut self, language: impl Into<String>, page_size: u32) -> Self {
        self.language = language.into();
        self.chat_page_size = page_size;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build a client from the `[news]` config section. Fails when the API key
    /// variable is not set.
    pub fn from_config(config: &common::NewsConfig) -> Result<Self> {
        let api_key = config.api_key().with_context(|| {
            format!("{} environment variable not set", config.api_key_env())
        })?;

        Ok(Self::new(config.api_url(), api_key)
            .with_defaults(config.timeout_seconds(), config.max_retries())
            .with_user_agent(config.user_agent())
            .with_chat_defaults(config.language(), config.chat_page_size()))
    }

    /// Full request URL for an endpoint, API key included.
    pub fn build_url(&self, endpoint: Endpoint, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path());
        let mut url = Url::parse(&base).with_context(|| format!("invalid news API URL: {}", base))?;
        url.query_pairs_mut()
            .append_pair("apiKey", &self.api_key)
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// GET a provider URL and decode its JSON body, retrying transient failures
    /// (network errors, 5xx, 429) with exponential backoff.
    async fn get_json(&self, url: Url) -> Result<(StatusCode, serde_json::Value)> {
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let backoff = Duration::from_secs(2u64.pow(attempt - 2)); // 1s, 2s, 4s...
                tracing::info!(
                    endpoint = url.path(),
                    "retrying news request (attempt {}/{}) after {:?}",
                    attempt,
                    self.max_retries,
                    backoff
                );
                tokio::time::sleep(backoff).await;
            }

            let sent = tokio::time::timeout(
                self.timeout,
                self.client
                    .get(url.clone())
                    .header("User-Agent", &self.user_agent)
                    .send(),
            )
            .await;

            match sent {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(anyhow::anyhow!("news provider returned {}", status));
                        continue;
                    }
                    let body: serde_json::Value = tokio::time::timeout(self.timeout, response.json())
                        .await
                        .context("news response body timed out")?
                        .context("failed to decode news provider response")?;
                    return Ok((status, body));
                }
                Ok(Err(e)) => {
                    last_error = Some(anyhow::Error::new(e).context("network error during news request"));
                }
                Err(_) => {
                    last_error = Some(anyhow::anyhow!("news request timed out after {:?}", self.timeout));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error after retries")))
    }
}

#[async_trait::async_trait]
impl NewsProvider for NewsApiClient {
    async fn search(&self, query: &NewsQuery) -> Result<NewsResponse> {
        let endpoint = query.endpoint();
        let params = query.params(Utc::now().date_naive());
        let url = self.build_url(endpoint, &params)?;

        let (status, body) = self.get_json(url).await?;
        let envelope: ProviderEnvelope =
            serde_json::from_value(body).context("unexpected news provider response shape")?;

        if !status.is_success() || envelope.status != "ok" {
            let message = envelope
                .message
                .unwrap_or_else(|| "no message from provider".to_string());
            anyhow::bail!(
                "news provider error {} ({}): {}",
                status,
                envelope.code.as_deref().unwrap_or("unknown"),
                message
            );
        }

        let articles = decode_articles(envelope.articles);
        tracing::debug!(
            endpoint = endpoint.path(),
            total = envelope.total_results,
            returned = articles.len(),
            "news search complete"
        );

        Ok(NewsResponse {
            status: envelope.status,
            total_results: envelope.total_results,
            articles,
        })
    }

    async fn search_raw(&self, text: &str) -> Result<serde_json::Value> {
        let params = [
            ("q", text.to_string()),
            ("language", self.language.clone()),
            ("pageSize", self.chat_page_size.to_string()),
        ];
        let url = self.build_url(Endpoint::Everything, &params)?;
        let (_, body) = self.get_json(url).await?;
        Ok(body)
    }
}

// NewsAPI v2 response envelope
#[derive(Debug, Deserialize)]
struct ProviderEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default, rename = "totalResults")]
    total_results: u64,
    #[serde(default)]
    articles: Vec<serde_json::Value>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_contains_key_and_params() {
        let client = NewsApiClient::new("https://newsapi.org/v2/", "secret");
        let url = client
            .build_url(
                Endpoint::TopHeadlines,
                &[("category", "sports".to_string()), ("pageSize", "10".to_string())],
            )
            .expect("build url");

        assert_eq!(url.path(), "/v2/top-headlines");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("apiKey".to_string(), "secret".to_string()));
        assert!(pairs.contains(&("category".to_string(), "sports".to_string())));
    }

    #[test]
    fn query_text_is_encoded() {
        let client = NewsApiClient::new("https://newsapi.org/v2", "k");
        let url = client
            .build_url(Endpoint::Everything, &[("q", "AI & tech news".to_string())])
            .expect("build url");
        assert!(url.as_str().contains("q=AI+%26+tech+news"));
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = common::NewsConfig {
            api_key_env: Some("NEWSLY_TEST_UNSET_KEY_VAR".to_string()),
            ..Default::default()
        };
        let err = NewsApiClient::from_config(&config).err().expect("missing key");
        assert!(err.to_string().contains("NEWSLY_TEST_UNSET_KEY_VAR"));
    }
}
