/*
newsly - main.rs
This binary loads configuration, wires the news provider and starts the Rocket HTTP server
serving the categorization, news and chat endpoints plus the dashboard page.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use newsly::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "newsly", about = "Newsly news assistant server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // NEWS_API_KEY usually lives in .env during development
    match dotenv::dotenv() {
        Ok(path) => info!(path = ?path, "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(%e, "failed to read .env file"),
    }

    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    let state = AppState::new(config);
    if state.news_provider.is_none() {
        warn!("news and chat endpoints will answer with an error until an API key is configured");
    }

    info!("Launching Rocket HTTP server");
    if let Err(e) = server::launch_rocket(state).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
