use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Settings persisted as JSON at `~/.config/wallpaper.json`.
///
/// Field order matters: serde serializes in declaration order, which keeps
/// the on-disk key order stable across rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL template with a `{query}` placeholder
    pub url: String,
    /// Search term substituted into the template, may be empty
    pub query: String,
    /// Refresh interval in seconds, kept for compatibility but not acted on
    pub interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            url: "https://source.unsplash.com/{query}/7680x4320".to_string(),
            query: String::new(),
            interval: 60 * 60 * 24,
        }
    }
}

impl Config {
    /// Load settings from `path`, or the defaults when no file exists yet.
    /// A file that exists but does not parse is a fatal error.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::metadata(path).await.is_err() {
            return Ok(Config::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed config file {}", path.display()))?;
        Ok(config)
    }

    /// Overwrite `path` with the pretty-printed JSON form of the settings.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// A query given on the command line wins over the stored one;
    /// `None` keeps whatever the config already holds.
    pub fn merge_query(&mut self, query: Option<String>) {
        if let Some(query) = query {
            self.query = query;
        }
    }
}
