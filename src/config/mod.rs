//! Configuration module for Crawly
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file and layering command-line overrides on top of it.
//!
//! # Example
//!
//! ```no_run
//! use crawly::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawly.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FailurePolicy, NavigatorConfig, OutputConfig, ProxyConfig,
    SearchMethod, StopPolicy, DEFAULT_USER_AGENTS,
};

// Re-export parser functions
pub use parser::{apply_overrides, load_config, parse_config, resolve_config, CrawlOverrides};
pub use validation::{validate, validate_depth, validate_time};
