//! Configuration module for Shelf-Surfer
//!
//! This module handles loading, parsing, and validating the TOML crawler
//! settings. Every section has defaults, so an empty file (or no file at all)
//! yields a working configuration aimed at the public catalog host.
//!
//! # Example
//!
//! ```no_run
//! use shelf_surfer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("surfer.toml")).unwrap();
//! println!("Crawling {}", config.crawler.host);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, CrawlerConfig, ExtraSubcategory, HeaderConfig, OutputConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
