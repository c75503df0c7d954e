// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Demo site configuration: content locations and the values every page starts from
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root of the page templates (documents, layouts, partials)
    pub views_dir: String,
    /// Static assets served as-is
    pub public_dir: String,
    /// JSON fixtures backing the mock API
    pub data_dir: String,
    /// Prefix joined in front of every generated link
    pub basepath: String,
    pub title: String,
    pub locale: String,
    pub theme: String,
    pub live_reload: bool,
    pub version: String,
    #[serde(default)]
    pub commit: String,
}

/// Directory listing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Regex patterns; entries whose name matches any of them are hidden
    #[serde(default = "default_listing_excludes")]
    pub excludes: Vec<String>,
    /// Sort entries by name instead of keeping filesystem enumeration order
    #[serde(default)]
    pub sort_entries: bool,
}

fn default_listing_excludes() -> Vec<String> {
    vec![
        r"^layout.*\.html$".to_string(),
        r"^footer\.html$".to_string(),
        r"\.DS_Store".to_string(),
    ]
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            excludes: default_listing_excludes(),
            sort_entries: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_defaults_when_section_missing() {
        let listing = ListingConfig::default();
        assert_eq!(listing.excludes.len(), 3);
        assert!(!listing.sort_entries);
    }

    #[test]
    fn test_listing_partial_section() {
        let listing: ListingConfig = toml::from_str("sort_entries = true").unwrap();
        assert!(listing.sort_entries);
        assert_eq!(listing.excludes, default_listing_excludes());

        let listing: ListingConfig = toml::from_str(r#"excludes = ["^draft-"]"#).unwrap();
        assert_eq!(listing.excludes, vec!["^draft-".to_string()]);
    }

    #[test]
    fn test_site_section_from_toml() {
        let site: SiteConfig = toml::from_str(
            r#"
            views_dir = "views"
            public_dir = "public"
            data_dir = "demoapp/data"
            basepath = "/"
            title = "SoHo XI"
            locale = "en-US"
            theme = "light"
            live_reload = true
            version = "4.0.0"
            "#,
        )
        .unwrap();
        assert_eq!(site.views_dir, "views");
        assert!(site.commit.is_empty());
    }
}
