use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::fetcher::IconPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// How long a fetched snapshot is served, in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Origin allowed to call the JSON API from a browser
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Drop a source whose favicon cannot be fetched
    #[serde(default = "default_require_icon")]
    pub require_icon: bool,
    pub feeds: Vec<FeedConfig>,
}

fn default_cache_ttl_minutes() -> u64 {
    5
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_allowed_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_static_dir() -> String {
    "rss-ui/dist/rss-index".to_string()
}

fn default_require_icon() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    pub url: String,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    pub fn icon_policy(&self) -> IconPolicy {
        if self.require_icon {
            IconPolicy::Required
        } else {
            IconPolicy::Optional
        }
    }

    /// Feed URLs in the order they appear in the file.
    pub fn source_urls(&self) -> Vec<String> {
        self.feeds.iter().map(|f| f.url.clone()).collect()
    }
}
