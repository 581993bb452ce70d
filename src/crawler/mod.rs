//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind a navigation contract
//! - Anti-bot navigation (headers, Referer chain, consent, CAPTCHA hand-off)
//! - HTML parsing and link extraction
//! - Breadth-first and depth-first traversal under a time and depth budget

mod captcha;
mod engine;
mod fetcher;
mod frontier;
mod headers;
mod navigator;
mod parser;

pub use captcha::{is_captcha_page, CaptchaResolver, ConsoleResolver, CAPTCHA_KEYWORDS};
pub use engine::{CrawlBudget, CrawlReport, ProgressCallback, TraversalEngine};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher, Navigation};
pub use frontier::{Frontier, FrontierEntry, VisitedSet};
pub use headers::{build_headers, pick_user_agent};
pub use navigator::{AntiBotNavigator, FetchOutcome, FetchPhase, FetchedPage};
pub use parser::{extract_links, parse_html, ParsedPage};

use crate::config::Config;
use crate::output::{self, ArtifactSink, Artifacts, ResultSink};
use crate::{CrawlyError, Result};
use url::Url;

/// Everything a completed crawl produced
#[derive(Debug)]
pub struct CrawlRun {
    /// Run name, the stem of the artifact files
    pub run_id: String,
    pub report: CrawlReport,
    pub artifacts: Artifacts,
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the anti-bot navigator
/// 2. Traverse from the seed with the configured method and budget
/// 3. Write the CSV table and, with enough edges, the graph visualization
///
/// The configuration is expected to be validated already.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Start URL
/// * `progress` - Optional per-page progress callback
///
/// # Returns
///
/// * `Ok(CrawlRun)` - Crawl completed and artifacts were written
/// * `Err(CrawlyError)` - Crawl aborted in strict mode or output failed
pub async fn crawl(
    config: &Config,
    seed: &Url,
    progress: Option<ProgressCallback>,
) -> Result<CrawlRun> {
    let run_id = output::run_id(&chrono::Local::now());

    let fetcher = HttpFetcher::new(&config.navigator, &config.proxy).map_err(CrawlyError::Client)?;
    let resolver = ConsoleResolver::new(config.navigator.captcha_wait());
    let navigator = AntiBotNavigator::new(fetcher, resolver, config.navigator.clone());

    let mut engine = TraversalEngine::new(navigator)
        .with_stop_policy(config.crawler.stop_policy)
        .with_failure_policy(config.crawler.failure_policy);
    if let Some(callback) = progress {
        engine = engine.with_progress_callback(callback);
    }

    let mut sink = ArtifactSink::new(&config.output.directory, config.crawler.full_graph);
    let report = engine
        .run(
            seed,
            config.crawler.method,
            CrawlBudget::from_config(&config.crawler),
            &mut sink,
        )
        .await?;

    let artifacts = sink.finalize(&run_id, &report.visited)?;

    Ok(CrawlRun {
        run_id,
        report,
        artifacts,
    })
}
