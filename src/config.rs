use crate::favicon::{DEFAULT_CACHE_CAPACITY, DEFAULT_FETCH_WORKERS, DEFAULT_ICON_SIZE};
use crate::history::DEFAULT_HISTORY_LIMIT;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use xdg::BaseDirectories;

/// Page opened in the first tab on startup
pub const DEFAULT_HOME_LOCATION: &str = "http://docs.oracle.com/javafx/2.0/get_started/jfxpub-get_started.htm";

const DEFAULT_BOOKMARKS: [&str; 5] = [
    "http://fxexperience.com/",
    "http://jewelsea.wordpress.com/",
    "http://docs.oracle.com/javafx/",
    "http://docs.oracle.com/javafx/2/api/index.html",
    "https://forums.oracle.com/forums/forum.jspa?forumID=1385&start=0",
];

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    pub home_location: String,
    pub history_limit: usize,
    pub bookmarks: Vec<String>,
    pub favicon: FaviconConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FaviconConfig {
    pub cache_capacity: usize,
    pub workers: usize,
    pub icon_size: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            home_location: DEFAULT_HOME_LOCATION.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            bookmarks: DEFAULT_BOOKMARKS.iter().map(|b| b.to_string()).collect(),
            favicon: FaviconConfig::default(),
        }
    }
}

impl Default for FaviconConfig {
    fn default() -> Self {
        FaviconConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            workers: DEFAULT_FETCH_WORKERS,
            icon_size: DEFAULT_ICON_SIZE,
            timeout_secs: None,
        }
    }
}

impl FaviconConfig {
    /// Request timeout, or `None` to rely on the network client's default
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    // Check if file exists
    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    parse(&content)
}

/// Parse config text, falling back to defaults when it is invalid
pub fn parse(content: &str) -> Config {
    toml::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid config file: {}", e);
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_file, "/dev/null");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.bookmarks.len(), 5);
        assert_eq!(config.favicon.cache_capacity, 200);
        assert_eq!(config.favicon.workers, 4);
        assert_eq!(config.favicon.timeout(), None);
    }

    #[test]
    fn test_config_from_toml_partial() {
        let toml_str = r#"
home_location = "http://example.com"
history_limit = 25

[favicon]
workers = 2
timeout_secs = 5
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.home_location, "http://example.com");
        assert_eq!(config.history_limit, 25);
        assert_eq!(config.favicon.workers, 2);
        assert_eq!(config.favicon.cache_capacity, 200);
        assert_eq!(config.favicon.timeout(), Some(Duration::from_secs(5)));
        // Unset keys keep their defaults
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bookmarks.len(), 5);
    }

    #[test]
    fn test_config_bookmarks_override() {
        let toml_str = r#"
bookmarks = ["http://a.com", "http://b.com"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bookmarks, vec!["http://a.com", "http://b.com"]);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let config = parse("history_limit = \"lots\"");
        assert_eq!(config.history_limit, 100);
    }
}
