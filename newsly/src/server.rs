use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rocket::fs::FileServer;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Redirect;
use rocket::serde::json::{self, Json};
use rocket::{get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use common::Config;

use crate::classifier::{self, Category, Classification, CATEGORIES};
use crate::news::newsapi::NewsApiClient;
use crate::news::{self, NewsProvider, NewsQuery, NewsResponse};
use crate::topics::{TrendingTopic, TRENDING_TOPICS};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub config: Arc<Config>,
    /// `None` when no API key is configured; news and chat then answer with an error.
    pub news_provider: Option<Arc<dyn NewsProvider>>,
}

impl AppState {
    /// Build state from configuration, creating the NewsAPI client when an API key is available.
    pub fn new(config: Config) -> Self {
        let news_provider = match NewsApiClient::from_config(&config.news) {
            Ok(client) => {
                tracing::info!(api_url = config.news.api_url(), "news provider initialized");
                Some(Arc::new(client) as Arc<dyn NewsProvider>)
            }
            Err(e) => {
                tracing::warn!("news provider disabled: {}", e);
                None
            }
        };
        Self::with_provider(config, news_provider)
    }

    pub fn with_provider(config: Config, news_provider: Option<Arc<dyn NewsProvider>>) -> Self {
        Self {
            started_at: Utc::now(),
            config: Arc::new(config),
            news_provider,
        }
    }

    fn missing_key_message(&self) -> String {
        format!(
            "{} environment variable not set. Add it to your environment or .env file.",
            self.config.news.api_key_env()
        )
    }
}

/// Response structure for `/api/v1/status`.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime_seconds: i64,
    news_provider: bool,
    categories: usize,
}

/// Request body for `/api/categorize`. `text` is kept untyped so that a
/// non-string value is reported as invalid input rather than a parse failure.
#[derive(Deserialize)]
struct CategorizeRequest {
    #[serde(default)]
    text: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Error payload of the news endpoint.
#[derive(Serialize)]
struct NewsError {
    status: &'static str,
    message: String,
}

/// Error payload of the chat endpoint.
#[derive(Serialize)]
struct ChatError {
    error: String,
}

fn news_error(status: Status, message: impl Into<String>) -> Custom<Json<NewsError>> {
    Custom(status, Json(NewsError { status: "error", message: message.into() }))
}

fn chat_error(status: Status, message: impl Into<String>) -> Custom<Json<ChatError>> {
    Custom(status, Json(ChatError { error: message.into() }))
}

/// One row of `/api/categories`.
#[derive(Serialize)]
struct CategoryInfo {
    name: Category,
    keywords: &'static [&'static str],
    insight: &'static str,
}

/// Redirect root to the dashboard page
#[get("/")]
async fn index_redirect() -> Redirect {
    Redirect::to("/static/index.html")
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

#[get("/api/v1/status")]
async fn status(state: &State<AppState>) -> Json<StatusResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds();
    Json(StatusResponse {
        status: "ok",
        uptime_seconds: uptime,
        news_provider: state.news_provider.is_some(),
        categories: CATEGORIES.len(),
    })
}

/// Classify pasted text. Always answers 200: unreadable bodies map to the
/// processing-error result, missing or non-string text to the invalid-input one.
#[post("/api/categorize", data = "<body>")]
async fn categorize(body: Result<Json<CategorizeRequest>, json::Error<'_>>) -> Json<Classification> {
    let result = match body {
        Ok(request) => classifier::classify_input(
            request.text.as_ref().and_then(serde_json::Value::as_str),
        ),
        Err(e) => {
            tracing::warn!(error = ?e, "categorize: unreadable request body");
            Classification::processing_error()
        }
    };

    tracing::info!(
        category = %result.category,
        confidence = result.confidence,
        matched = result.matched_keywords.len(),
        "categorize: classified text"
    );
    Json(result)
}

#[get("/api/categories")]
async fn list_categories() -> Json<Vec<CategoryInfo>> {
    let rows = CATEGORIES
        .iter()
        .map(|(category, keywords)| CategoryInfo {
            name: *category,
            keywords: *keywords,
            insight: category.insight(),
        })
        .collect();
    Json(rows)
}

#[get("/api/topics")]
async fn list_topics() -> Json<&'static [TrendingTopic]> {
    Json(TRENDING_TOPICS)
}

/// Search the news provider and tag each article with its sentiment.
#[post("/api/news", data = "<body>")]
async fn search_news(
    state: &State<AppState>,
    body: Result<Json<NewsQuery>, json::Error<'_>>,
) -> Result<Json<NewsResponse>, Custom<Json<NewsError>>> {
    let query = body
        .map_err(|e| {
            tracing::warn!(error = ?e, "news: unreadable request body");
            news_error(Status::BadRequest, "Invalid request body")
        })?
        .into_inner();

    let provider = state.news_provider.as_ref().ok_or_else(|| {
        tracing::error!("news: no provider configured");
        news_error(Status::InternalServerError, state.missing_key_message())
    })?;

    match news::fetch_annotated(provider.as_ref(), &query).await {
        Ok(response) => {
            tracing::info!(
                endpoint = query.endpoint().path(),
                articles = response.articles.len(),
                total = response.total_results,
                "news: search complete"
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("news: provider request failed: {:#}", e);
            Err(news_error(Status::BadGateway, format!("{:#}", e)))
        }
    }
}

/// Forward a chat message to the provider as a search and hand back its raw answer.
#[post("/api/chat", data = "<body>")]
async fn chat(
    state: &State<AppState>,
    body: Result<Json<ChatRequest>, json::Error<'_>>,
) -> Result<Json<serde_json::Value>, Custom<Json<ChatError>>> {
    const INVALID: &str = "Invalid request body: 'message' is required";

    let request = body.map_err(|e| {
        tracing::warn!(error = ?e, "chat: unreadable request body");
        chat_error(Status::BadRequest, INVALID)
    })?;

    let message = request
        .message
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| chat_error(Status::BadRequest, INVALID))?;

    let provider = state.news_provider.as_ref().ok_or_else(|| {
        tracing::error!("chat: no provider configured");
        chat_error(Status::InternalServerError, state.missing_key_message())
    })?;

    match provider.search_raw(message).await {
        Ok(body) => {
            tracing::info!(chars = message.len(), "chat: forwarded message");
            Ok(Json(body))
        }
        Err(e) => {
            tracing::error!("chat: provider request failed: {:#}", e);
            Err(chat_error(Status::InternalServerError, format!("{:#}", e)))
        }
    }
}

/// Assemble the Rocket instance with managed state and all routes.
///
/// `[server] bind` and `port` from the configuration override Rocket's own
/// defaults. The dashboard directory is mounted under `/static` when it exists.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    let mut fig = rocket::Config::figment();
    if let Some(bind) = state.config.server.bind.as_deref() {
        fig = fig.merge(("address", bind.to_string()));
    }
    if let Some(port) = state.config.server.port {
        fig = fig.merge(("port", port));
    }

    let static_dir = state.config.server.static_dir().to_string();

    let mut rocket = rocket::custom(fig).manage(state).mount(
        "/",
        routes![
            index_redirect,
            health,
            status,
            categorize,
            list_categories,
            list_topics,
            search_news,
            chat,
        ],
    );

    if Path::new(&static_dir).is_dir() {
        rocket = rocket.mount("/static", FileServer::from(static_dir));
    } else {
        tracing::warn!(dir = %static_dir, "static directory not found; dashboard disabled");
    }

    rocket
}

/// Build and launch the Rocket server.
///
/// Blocks until the server shuts down and returns an error if Rocket fails to start.
pub async fn launch_rocket(state: AppState) -> Result<()> {
    tracing::info!("Starting Rocket HTTP server");
    build_rocket(state)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
