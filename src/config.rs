use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_PORT: u16 = 8080;

/// Process settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub content_dir: PathBuf,
    pub port: u16,
    pub is_development: bool,
    pub log_filter: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        RuntimeConfig {
            content_dir: lookup("CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR)),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            is_development: lookup("RUST_ENV").is_some_and(|v| v == "development"),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".into()),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// Sidebar content, from `site.toml` in the content directory.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub author: String,
    pub tagline: String,
    pub author_url: Option<String>,
    pub subscribe_url: String,
    #[serde(default = "default_subscribe_label")]
    pub subscribe_label: String,
    /// First year in the copyright footer.
    pub since: i32,
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

fn default_subscribe_label() -> String {
    "Subscribe".to_string()
}

impl SiteConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
