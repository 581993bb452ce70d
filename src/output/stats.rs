//! Run statistics
//!
//! Counters collected by the traversal engine and their terminal rendering.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Pages fetched and parsed successfully
    pub pages_fetched: u64,

    /// Pages whose fetch failed on both the direct and protected path
    pub pages_failed: u64,

    /// Pages served on the direct fast path
    pub direct_fetches: u64,

    /// Pages that needed the protected retry
    pub protected_fetches: u64,

    /// Consent controls successfully clicked
    pub consent_clicks: u64,

    /// Pages flagged by the CAPTCHA heuristic
    pub captcha_pages: u64,

    /// Frontier entries discarded for exceeding the depth budget
    pub skipped_depth: u64,

    /// Frontier entries discarded after the time budget ran out
    pub skipped_time: u64,

    /// Edges recorded
    pub edges: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Number of pages a fetch was attempted for
    pub fn pages_attempted(&self) -> u64 {
        self.pages_fetched + self.pages_failed
    }
}

/// Formats a duration as `HH:MM:SS`
///
/// Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Elapsed time: {}", format_elapsed(stats.elapsed));
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Links recorded: {}", stats.edges);
    println!();

    println!("Navigation:");
    println!("  Direct fetches: {}", stats.direct_fetches);
    println!("  Protected fetches: {}", stats.protected_fetches);
    println!("  Consent banners accepted: {}", stats.consent_clicks);
    println!("  CAPTCHA pages: {}", stats.captcha_pages);
    println!();

    if stats.skipped_depth > 0 || stats.skipped_time > 0 {
        println!("Skipped:");
        println!("  Beyond depth budget: {}", stats.skipped_depth);
        println!("  After time budget: {}", stats.skipped_time);
        println!();
    }

    let attempted = stats.pages_attempted();
    let success_rate = if attempted > 0 {
        (stats.pages_fetched as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully fetched)",
        success_rate, stats.pages_fetched, attempted
    );
}
