//! Shelf-Surfer: a polite best-seller catalog crawler
//!
//! This crate walks the paginated best-seller listings of a category catalog,
//! extracts product attributes from each detail page, filters them against
//! caller-supplied ranges and streams accepted products as they are found.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod filter;
pub mod output;

use thiserror::Error;

/// Main error type for Shelf-Surfer operations
#[derive(Debug, Error)]
pub enum SurferError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl options: {0}")]
    Options(#[from] OptionsError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("A crawl run is already active")]
    RunActive,

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while mapping caller input into crawl options
///
/// All of these are reported before a run starts.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    Field {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown category id: {0}")]
    UnknownCategory(u8),

    #[error("No categories selected")]
    NoCategories,

    #[error("Range '{field}' is inverted: minimum exceeds maximum")]
    InvertedRange { field: &'static str },
}

/// Errors building catalog URLs
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Shelf-Surfer operations
pub type Result<T> = std::result::Result<T, SurferError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use catalog::{Catalog, Category, Subcategory};
pub use config::Config;
pub use crawler::{CancelSignal, Coordinator, ProductStream, RunSummary};
pub use extract::Product;
pub use filter::{is_valid, CrawlOptions, OptionsForm, UnknownPolicy};
