use anyhow::{Context, Result};
use chrono::Utc;

use newsly::news::newsapi::NewsApiClient;
use newsly::news::{fetch_annotated, render_digest, NewsQuery};

/// Fetch live articles for a query and print them with their sentiment.
///
/// Usage: fetch_news [QUERY]   (default: "artificial intelligence")
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let _ = dotenv::dotenv();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "artificial intelligence".to_string());

    let client = NewsApiClient::from_config(&common::NewsConfig::default())
        .context("Set NEWS_API_KEY in the environment or a .env file")?;

    println!("\n{}", "=".repeat(60));
    println!("Query: {}", query);
    println!("{}", "=".repeat(60));

    let mut request = NewsQuery::search(query);
    request.page_size = Some(5);

    let response = fetch_annotated(&client, &request).await?;
    println!("Total results: {}\n", response.total_results);
    print!("{}", render_digest(&response.articles, Utc::now()));

    Ok(())
}
