//! Crawly: a bounded web crawler
//!
//! This crate explores the pages reachable from a seed URL within a time and
//! depth budget, breadth-first or depth-first, recording page text and the
//! link graph while working around simple anti-bot walls (cookie banners,
//! CAPTCHA pages).

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for run-level failures
#[derive(Debug, Error)]
pub enum CrawlyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Unresolved error while fetching {url}. Check internet connection or proxy server.\nInfo: {source}"
    )]
    Aborted {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and input validation errors
///
/// Every variant is fatal and raised before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Passed URL address is incorrect: {0}")]
    InvalidUrl(String),

    #[error("Incorrect method '{0}'. Only BFS, DFS are allowed.")]
    InvalidMethod(String),

    #[error("Incorrect time. Time cannot be lower than 1 second, got {0}.")]
    InvalidTime(i64),

    #[error("Incorrect depth. Depth cannot be lower than 1, got {0}.")]
    InvalidDepth(i64),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while fetching a single page
///
/// In resilient mode these are logged with the offending URL and the page is
/// skipped; in strict mode they abort the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("navigation to {url} timed out")]
    Timeout { url: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("CAPTCHA on {url} was not resolved")]
    CaptchaUnresolved { url: String },

    #[error("no page loaded; navigate before reading content")]
    NoPage,

    #[error("invalid header value: {0}")]
    Header(String),
}

impl FetchError {
    /// Classifies a reqwest error for the given URL
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for page fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::{Config, FailurePolicy, SearchMethod, StopPolicy};
pub use crawler::{crawl, CrawlBudget, TraversalEngine};
pub use output::{Edge, PageResult};
