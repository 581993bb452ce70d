use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default User-Agent pool rotated per crawl run
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Main configuration structure for Crawly
///
/// Every section is optional in the TOML file; missing keys take their
/// defaults and the CLI overrides the crawl parameters afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub navigator: NavigatorConfig,
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
}

/// Traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SearchMethod {
    /// FIFO frontier, depth by depth
    #[default]
    BreadthFirst,
    /// Explicit stack, one branch at a time
    DepthFirst,
}

impl FromStr for SearchMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BFS" => Ok(Self::BreadthFirst),
            "DFS" => Ok(Self::DepthFirst),
            _ => Err(ConfigError::InvalidMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for SearchMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BreadthFirst => write!(f, "BFS"),
            Self::DepthFirst => write!(f, "DFS"),
        }
    }
}

/// What breadth-first traversal does once the time budget is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopPolicy {
    /// Keep popping the frontier, skipping every over-budget entry
    #[default]
    Drain,
    /// Stop the loop as soon as an over-budget entry is popped
    HardStop,
}

/// How a page that could not be fetched is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log and skip the page, continue the traversal
    #[default]
    Resilient,
    /// Abort the whole run
    Strict,
}

/// Crawl parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Traversal order (bfs or dfs, case-insensitive)
    pub method: SearchMethod,

    /// Wall-clock budget in seconds
    pub max_time: u64,

    /// Deepest level that is still fetched (seed is depth 0)
    pub max_depth: u32,

    /// Keep edges to never-fetched pages in the graph export
    pub full_graph: bool,

    pub stop_policy: StopPolicy,

    pub failure_policy: FailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            method: SearchMethod::BreadthFirst,
            max_time: 60,
            max_depth: 10,
            full_graph: false,
            stop_policy: StopPolicy::Drain,
            failure_policy: FailurePolicy::Resilient,
        }
    }
}

/// Anti-bot navigation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NavigatorConfig {
    /// Pool of User-Agent strings; one is picked at random per run
    pub user_agents: Vec<String>,

    pub accept: String,

    pub accept_language: String,

    /// Referer sent with the very first request of a run
    pub bootstrap_referer: String,

    /// CSS selector of the cookie-consent control
    pub consent_selector: String,

    pub consent_wait_min_ms: u64,

    pub consent_wait_max_ms: u64,

    /// Upper bound on waiting for a CAPTCHA to be solved externally
    pub captcha_wait_secs: u64,

    /// Upper bound of the randomized delay before each navigation (0 disables)
    pub slow_mo_max_ms: u64,

    pub request_timeout_secs: u64,

    /// Wait for a human to solve CAPTCHAs; when false they are reported as unresolved
    pub interactive: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7".to_string(),
            accept_language: "pl-PL,pl;q=0.9,en-GB;q=0.8,en-US;q=0.7,en;q=0.6".to_string(),
            bootstrap_referer: "https://www.google.com/".to_string(),
            consent_selector: "button[data-role='accept-consent']".to_string(),
            consent_wait_min_ms: 1000,
            consent_wait_max_ms: 4000,
            captcha_wait_secs: 120,
            slow_mo_max_ms: 2000,
            request_timeout_secs: 20,
            interactive: true,
        }
    }
}

impl NavigatorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn captcha_wait(&self) -> Duration {
        Duration::from_secs(self.captcha_wait_secs)
    }
}

/// Optional proxy forwarded to the fetch layer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV and HTML artifacts are written to
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}
