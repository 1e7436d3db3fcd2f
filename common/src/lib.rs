/*!
common/src/lib.rs

Shared configuration types for Newsly.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader that merges a default config file with an optional override
- Accessors that resolve unset options to their documented defaults
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_API_KEY_ENV: &str = "NEWS_API_KEY";
pub const DEFAULT_USER_AGENT: &str = "Newsly/0.1.0";

/// HTTP server section (`[server]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1" or "0.0.0.0"
    pub bind: Option<String>,
    pub port: Option<u16>,
    /// Directory holding the dashboard page served under `/static`
    pub static_dir: Option<String>,
}

impl ServerConfig {
    pub fn static_dir(&self) -> &str {
        self.static_dir.as_deref().unwrap_or("newsly/static")
    }
}

/// News provider section (`[news]`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Base URL of the NewsAPI-compatible provider (without endpoint)
    pub api_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_retries: Option<u32>,
    pub user_agent: Option<String>,
    /// Language filter used by the chat search
    pub language: Option<String>,
    /// Number of articles returned by the chat search
    pub chat_page_size: Option<u32>,
}

impl NewsConfig {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_NEWS_API_URL)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(10)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(3).max(1)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }

    pub fn chat_page_size(&self) -> u32 {
        self.chat_page_size.unwrap_or(5)
    }

    /// Read the API key from the configured environment variable.
    /// Returns `None` when the variable is unset or blank.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub news: NewsConfig,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    /// Missing files are skipped, so with neither present every option takes its default.
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let val: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut config_value, val);
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would only fail later at request time.
    pub fn validate(&self) -> Result<()> {
        let api_url = self.news.api_url();
        let parsed = url::Url::parse(api_url)
            .with_context(|| format!("news.api_url is not a valid URL: {}", api_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("news.api_url must use http or https, got '{}'", parsed.scheme());
        }
        if self.server.port == Some(0) {
            bail!("server.port must be non-zero");
        }
        Ok(())
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}
