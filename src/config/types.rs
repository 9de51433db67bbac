use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Shelf-Surfer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub headers: HeaderConfig,
    pub output: OutputConfig,
    pub catalog: CatalogConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Scheme and host every listing and detail URL is built on
    pub host: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// Lower bound of the randomized politeness pause (milliseconds)
    #[serde(rename = "min-pause")]
    pub min_pause: u64,

    /// Upper bound of the randomized politeness pause (milliseconds)
    #[serde(rename = "max-pause")]
    pub max_pause: u64,

    /// Maximum listing pages walked per link, 0 for no limit
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            host: "https://www.amazon.com".to_string(),
            request_timeout: 10,
            connect_timeout: 5,
            min_pause: 10_000,
            max_pause: 60_000,
            max_pages: 0,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

/// Request headers sent with every fetch
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_4) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.8".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the markdown report written when a run ends
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}

/// Catalog extensions loaded at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Extra subcategories attached to built-in categories
    pub subcategory: Vec<ExtraSubcategory>,
}

/// A subcategory declared in the configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct ExtraSubcategory {
    /// Id of the built-in parent category
    pub category: u8,

    /// Browse node id of the subcategory
    pub id: u64,

    /// Path slug of the subcategory listing
    pub slug: String,
}
