//! Traversal engine
//!
//! Drives a breadth-first or depth-first crawl from a seed URL:
//! - pops `(url, depth)` entries from the frontier
//! - applies the depth and time budget before every fetch
//! - fetches through the anti-bot navigator and extracts text and links
//! - records page results and edges into a [`ResultSink`]
//!
//! Over-deep entries are always skipped. When the time budget runs out a
//! breadth-first crawl either drains the rest of the queue, skipping each
//! entry, or stops at once, depending on the [`StopPolicy`]. A depth-first
//! crawl always unwinds immediately.

use crate::config::{CrawlerConfig, FailurePolicy, SearchMethod, StopPolicy};
use crate::crawler::captcha::CaptchaResolver;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, FrontierEntry, VisitedSet};
use crate::crawler::navigator::AntiBotNavigator;
use crate::crawler::parser::parse_html;
use crate::output::{CrawlStatistics, Edge, PageResult, ResultSink};
use crate::{CrawlyError, FetchError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Called once per fetched entry with the elapsed run time and the entry depth
pub type ProgressCallback = Arc<dyn Fn(Duration, u32) + Send + Sync>;

/// Time and depth limits of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    pub max_time: Duration,
    pub max_depth: u32,
}

impl CrawlBudget {
    pub fn new(max_time_secs: u64, max_depth: u32) -> Self {
        Self {
            max_time: Duration::from_secs(max_time_secs),
            max_depth,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.max_time, config.max_depth)
    }

    /// Whether an entry at `depth` may still be fetched
    pub fn allows_depth(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    pub fn is_expired(&self, elapsed: Duration) -> bool {
        elapsed > self.max_time
    }
}

/// What a finished run leaves behind besides the sink contents
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Every URL a fetch was attempted for
    pub visited: VisitedSet,
    pub stats: CrawlStatistics,
}

/// Outcome of the budget check for a popped entry
enum Admission {
    Fetch,
    SkipDepth,
    SkipTime,
    Stop,
}

/// BFS/DFS crawl driver
pub struct TraversalEngine<F, R> {
    navigator: AntiBotNavigator<F, R>,
    stop_policy: StopPolicy,
    failure_policy: FailurePolicy,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher, R: CaptchaResolver> TraversalEngine<F, R> {
    /// Creates an engine with drain-skip stopping and resilient failure handling
    pub fn new(navigator: AntiBotNavigator<F, R>) -> Self {
        Self {
            navigator,
            stop_policy: StopPolicy::default(),
            failure_policy: FailurePolicy::default(),
            progress_callback: None,
        }
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn navigator(&self) -> &AntiBotNavigator<F, R> {
        &self.navigator
    }

    /// Crawls from `seed` until the frontier is exhausted or the budget stops it
    ///
    /// # Arguments
    ///
    /// * `seed` - First URL to fetch, at depth 0
    /// * `method` - Breadth-first or depth-first order
    /// * `budget` - Time and depth limits
    /// * `sink` - Receives page results and edges as they are produced
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The run finished; failed pages were skipped
    /// * `Err(CrawlyError)` - A page failed in strict mode, or the sink failed
    pub async fn run<S: ResultSink>(
        &mut self,
        seed: &Url,
        method: SearchMethod,
        budget: CrawlBudget,
        sink: &mut S,
    ) -> Result<CrawlReport> {
        self.navigator.reset();
        let started = Instant::now();

        tracing::info!(
            "Starting {} crawl from {} (max time: {}s, max depth: {})",
            method,
            seed,
            budget.max_time.as_secs(),
            budget.max_depth
        );

        let mut frontier = Frontier::for_method(method);
        let mut visited = VisitedSet::new();
        let mut stats = CrawlStatistics::default();

        // breadth-first only: URLs already in the queue
        let mut enqueued: HashSet<String> = HashSet::new();
        enqueued.insert(seed.as_str().to_string());
        frontier.push(FrontierEntry::seed(seed.clone()));

        while let Some(entry) = frontier.pop() {
            match self.admit(&entry, method, &budget, started.elapsed()) {
                Admission::Fetch => {}
                Admission::SkipDepth => {
                    tracing::trace!("Skipping {} at depth {}", entry.url, entry.depth);
                    stats.skipped_depth += 1;
                    continue;
                }
                Admission::SkipTime => {
                    stats.skipped_time += 1;
                    continue;
                }
                Admission::Stop => {
                    let dropped = frontier.clear() as u64;
                    stats.skipped_time += 1 + dropped;
                    tracing::info!(
                        "Time budget exhausted, dropping {} pending URLs",
                        dropped + 1
                    );
                    break;
                }
            }

            if visited.contains(entry.url.as_str()) {
                continue;
            }

            let Some(links) = self
                .visit(&entry, started, &mut visited, &mut stats, sink)
                .await?
            else {
                continue;
            };

            let children: Vec<FrontierEntry> = links
                .into_iter()
                .filter(|link| !visited.contains(link.as_str()))
                .filter(|link| match method {
                    SearchMethod::BreadthFirst => enqueued.insert(link.as_str().to_string()),
                    SearchMethod::DepthFirst => budget.allows_depth(entry.depth + 1),
                })
                .map(|link| entry.child(link))
                .collect();

            frontier.extend_children(children);
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            "Crawl finished: {} pages fetched, {} failed in {:.1}s",
            stats.pages_fetched,
            stats.pages_failed,
            stats.elapsed.as_secs_f64()
        );

        Ok(CrawlReport { visited, stats })
    }

    fn admit(
        &self,
        entry: &FrontierEntry,
        method: SearchMethod,
        budget: &CrawlBudget,
        elapsed: Duration,
    ) -> Admission {
        if !budget.allows_depth(entry.depth) {
            return Admission::SkipDepth;
        }
        if !budget.is_expired(elapsed) {
            return Admission::Fetch;
        }
        match (method, self.stop_policy) {
            (SearchMethod::BreadthFirst, StopPolicy::Drain) => Admission::SkipTime,
            _ => Admission::Stop,
        }
    }

    /// Fetches one entry and records its results
    ///
    /// Returns the page's links, or `None` when the page was skipped after a
    /// fetch failure.
    async fn visit<S: ResultSink>(
        &mut self,
        entry: &FrontierEntry,
        started: Instant,
        visited: &mut VisitedSet,
        stats: &mut CrawlStatistics,
        sink: &mut S,
    ) -> Result<Option<Vec<Url>>> {
        if let Some(callback) = &self.progress_callback {
            callback(started.elapsed(), entry.depth);
        }

        // claimed before fetching so a failing URL is never retried
        visited.insert(&entry.url);
        tracing::debug!("Fetching {} (depth {})", entry.url, entry.depth);

        let outcome = match self.navigator.fetch_page(&entry.url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                stats.pages_failed += 1;
                if matches!(e, FetchError::CaptchaUnresolved { .. }) {
                    stats.captcha_pages += 1;
                }
                return match self.failure_policy {
                    FailurePolicy::Strict => Err(CrawlyError::Aborted {
                        url: entry.url.to_string(),
                        source: e,
                    }),
                    FailurePolicy::Resilient => {
                        tracing::warn!("Skipping {}: {}", entry.url, e);
                        Ok(None)
                    }
                };
            }
        };

        if outcome.is_protected() {
            stats.protected_fetches += 1;
        } else {
            stats.direct_fetches += 1;
        }
        let page = outcome.page();
        if page.consent_clicked {
            stats.consent_clicks += 1;
        }
        if page.captcha_detected {
            stats.captcha_pages += 1;
        }

        let parsed = parse_html(&outcome.into_html(), &entry.url);
        sink.record_page(PageResult {
            url: entry.url.to_string(),
            text: parsed.text,
        })?;
        stats.pages_fetched += 1;

        for link in &parsed.links {
            sink.record_edge(Edge::new(entry.url.as_str(), link.as_str()))?;
            stats.edges += 1;
        }

        Ok(Some(parsed.links))
    }
}
