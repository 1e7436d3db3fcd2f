use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::sentiment::{score_sentiment, Sentiment};
use crate::timefmt::format_distance;

/// Core trait for news providers (NewsAPI or a test double)
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Structured search. Returned articles carry no sentiment yet.
    async fn search(&self, query: &NewsQuery) -> Result<NewsResponse>;

    /// Free-text search used by the chat; the provider's JSON is returned untouched.
    async fn search_raw(&self, text: &str) -> Result<serde_json::Value>;
}

/// Run a structured search and tag every article with its sentiment.
pub async fn fetch_annotated(provider: &dyn NewsProvider, query: &NewsQuery) -> Result<NewsResponse> {
    let mut response = provider.search(query).await?;
    annotate_sentiment(&mut response.articles);
    Ok(response)
}

/// Filters accepted by the news endpoint (JSON body, camelCase)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsQuery {
    pub query: Option<String>,
    /// Provider category, only honoured for headline searches
    pub category: Option<String>,
    /// 2-letter ISO 3166-1 code, only honoured for headline searches
    pub country: Option<String>,
    /// YYYY-MM-DD
    pub from_date: Option<String>,
    /// YYYY-MM-DD
    pub to_date: Option<String>,
    pub page_size: Option<u32>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
/// Look-back window applied to full searches without an explicit start date
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Provider endpoint selected for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Everything,
    TopHeadlines,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Everything => "everything",
            Endpoint::TopHeadlines => "top-headlines",
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl NewsQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    /// Full-text search when a query or a start date is given, headlines otherwise.
    pub fn endpoint(&self) -> Endpoint {
        if non_empty(&self.query).is_some() || non_empty(&self.from_date).is_some() {
            Endpoint::Everything
        } else {
            Endpoint::TopHeadlines
        }
    }

    /// Provider query parameters (without the API key), in a stable order.
    /// `today` anchors the default look-back window.
    pub fn params(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let query = non_empty(&self.query);
        let from_date = non_empty(&self.from_date);

        let mut params = vec![("pageSize", self.page_size().to_string())];

        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }
        if query.is_none() {
            if let Some(category) = non_empty(&self.category) {
                params.push(("category", category.to_string()));
            }
            if let Some(country) = non_empty(&self.country) {
                params.push(("country", country.to_string()));
            }
        }
        if let Some(from) = from_date {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = non_empty(&self.to_date) {
            params.push(("to", to.to_string()));
        }
        if self.endpoint() == Endpoint::Everything && from_date.is_none() {
            let since = today - Duration::days(DEFAULT_LOOKBACK_DAYS);
            params.push(("from", since.format("%Y-%m-%d").to_string()));
        }

        let sort_by = if query.is_some() { "relevancy" } else { "publishedAt" };
        params.push(("sortBy", sort_by.to_string()));

        params
    }
}

/// Response of the news endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    pub total_results: u64,
    pub articles: Vec<Article>,
}

/// Publisher of an article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A news article as returned by the provider. Missing or `null` fields are
/// defaulted here so the rest of the code never sees untyped JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

impl Article {
    pub fn score(&self) -> Sentiment {
        score_sentiment(&self.title, self.description.as_deref().unwrap_or(""))
    }

    /// e.g. "2 hours ago"; `None` when the provider gave no usable timestamp.
    pub fn published_ago(&self, now: DateTime<Utc>) -> Option<String> {
        self.published_at.map(|at| format_distance(at, now, true))
    }
}

/// Tag each article with its sentiment, keeping the input order.
pub fn annotate_sentiment(articles: &mut [Article]) {
    for article in articles.iter_mut() {
        article.sentiment = Some(article.score());
    }
}

/// Decode provider article objects one by one. An entry that cannot be
/// decoded is logged and dropped; the others are kept in order.
pub fn decode_articles(raw: Vec<serde_json::Value>) -> Vec<Article> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Article>(value) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(index, error = %e, "skipping undecodable article");
                None
            }
        })
        .collect()
}

/// Plain-text listing used by the command line helper.
pub fn render_digest(articles: &[Article], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (i, article) in articles.iter().enumerate() {
        out.push_str(&format!("{}. {} ({})", i + 1, article.title, article.source.name));
        if let Some(sentiment) = article.sentiment {
            out.push_str(&format!(" [{}]", sentiment));
        }
        if let Some(ago) = article.published_ago(now) {
            out.push_str(&format!(" - {}", ago));
        }
        out.push('\n');
        if let Some(description) = article.description.as_deref() {
            out.push_str(description);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

pub mod newsapi;
