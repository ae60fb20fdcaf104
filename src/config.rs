// src/config.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::domain::error::DomainResult;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteOpts {
    /// Output directory for the rendered site (default: "_site")
    #[serde(default = "default_site_dir")]
    pub dir: String,

    /// Site title used in page headers and the feed
    #[serde(default = "default_site_title")]
    pub title: String,

    /// Canonical site URL, trailing slash included
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Feed author name
    #[serde(default)]
    pub author: String,

    /// Base URL that tag links point at; the tag is appended verbatim
    #[serde(default = "default_tag_base_url")]
    pub tag_base_url: String,

    /// Links on the index page (default: 100)
    #[serde(default = "default_index_count")]
    pub index_count: usize,

    /// Entries in the Atom feed (default: 100)
    #[serde(default = "default_index_count")]
    pub feed_count: usize,

    /// Entries in recent_links.json (default: 15)
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
}

fn default_site_dir() -> String {
    "_site".to_string()
}

fn default_site_title() -> String {
    "Linklog".to_string()
}

fn default_site_url() -> String {
    "https://example.com/".to_string()
}

fn default_tag_base_url() -> String {
    "https://pinboard.in/t:".to_string()
}

fn default_index_count() -> usize {
    100
}

fn default_recent_count() -> usize {
    15
}

impl Default for SiteOpts {
    fn default() -> Self {
        Self {
            dir: default_site_dir(),
            title: default_site_title(),
            url: default_site_url(),
            author: String::new(),
            tag_base_url: default_tag_base_url(),
            index_count: default_index_count(),
            feed_count: default_index_count(),
            recent_count: default_recent_count(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    /// Pinboard API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Pinboard API token (user:hex); usually set via PINBOARD_API_TOKEN
    #[serde(default)]
    pub api_token: String,

    /// Page size for incremental fetches (default: 20)
    #[serde(default = "default_fetch_count")]
    pub fetch_count: usize,

    /// Restrict fetches to a single tag
    #[serde(default)]
    pub fetch_tag: Option<String>,

    /// Options for the rendered site
    #[serde(default)]
    pub site: SiteOpts,
}

fn default_db_path() -> String {
    let db_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/linklog");

    // Ensure directory exists
    std::fs::create_dir_all(&db_dir).ok();

    db_dir
        .join("linklog.db")
        .to_str()
        .unwrap_or("linklog.db")
        .to_string()
}

fn default_api_url() -> String {
    "https://api.pinboard.in/v1".to_string()
}

fn default_fetch_count() -> usize {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            api_url: default_api_url(),
            api_token: String::new(),
            fetch_count: default_fetch_count(),
            fetch_tag: None,
            site: SiteOpts::default(),
        }
    }
}

// Load settings from config files and environment variables
pub fn load_settings(config_path: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = Settings::default();

    // Explicit -c path wins over the standard location
    let config_sources = [
        config_path.map(Path::to_path_buf),
        dirs::home_dir().map(|p| p.join(".config/linklog/config.toml")),
    ];

    for config_path in config_sources.iter().flatten() {
        if config_path.exists() {
            trace!("Loading config from: {:?}", config_path);

            if let Ok(config_text) = std::fs::read_to_string(config_path) {
                if let Ok(file_settings) = toml::from_str::<Settings>(&config_text) {
                    settings = file_settings;
                    break;
                }
            }
        }
    }

    // Override with environment variables; the PINBOARD_* names predate
    // this tool and are kept for existing cron setups.
    if let Ok(db_url) = std::env::var("LINKLOG_DB_URL") {
        trace!("Using LINKLOG_DB_URL from environment: {}", db_url);
        settings.db_url = db_url;
    }

    if let Ok(token) = std::env::var("PINBOARD_API_TOKEN") {
        settings.api_token = token;
    }

    if let Ok(count) = std::env::var("PINBOARD_API_COUNT") {
        if let Ok(count) = count.parse() {
            settings.fetch_count = count;
        }
    }

    if let Ok(tag) = std::env::var("PINBOARD_API_TAG") {
        settings.fetch_tag = Some(tag);
    }

    Ok(settings)
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
