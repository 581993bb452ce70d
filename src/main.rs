//! Crawly main entry point
//!
//! This is the command-line interface for the Crawly bounded web crawler.

use anyhow::Context;
use clap::Parser;
use crawly::config::{resolve_config, Config, CrawlOverrides};
use crawly::crawler::{crawl, ProgressCallback};
use crawly::output::{format_elapsed, print_statistics};
use crawly::url::parse_seed;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Crawly: a bounded web crawler
///
/// Crawly explores the pages reachable from a start URL, breadth-first or
/// depth-first, within a time and depth budget. It saves the text of every
/// page as CSV and the link graph as an interactive HTML page.
#[derive(Parser, Debug)]
#[command(name = "crawl")]
#[command(version = "1.0.0")]
#[command(about = "A bounded web crawler", long_about = None)]
struct Cli {
    /// Start URL (the "www." form without a scheme is accepted)
    #[arg(value_name = "URL")]
    url: String,

    /// Traversal method: bfs or dfs
    #[arg(short, long)]
    method: Option<String>,

    /// Time budget in seconds [default: 60]
    #[arg(short, long, allow_negative_numbers = true)]
    time: Option<i64>,

    /// Maximum link depth from the start URL [default: 10]
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Include links to pages that were never fetched in the graph
    #[arg(long)]
    full_graph: bool,

    /// Proxy server address, e.g. http://127.0.0.1:8080
    #[arg(long)]
    proxy_server: Option<String>,

    /// Proxy username
    #[arg(long)]
    proxy_username: Option<String>,

    /// Proxy password
    #[arg(long)]
    proxy_password: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Abort the whole crawl on the first page that cannot be fetched
    #[arg(long)]
    strict: bool,

    /// Stop a breadth-first crawl as soon as the time budget runs out
    #[arg(long)]
    hard_stop: bool,

    /// Do not wait for CAPTCHAs to be solved by hand
    #[arg(long)]
    non_interactive: bool,

    /// Directory the CSV and HTML files are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CrawlOverrides {
        CrawlOverrides {
            method: self.method.clone(),
            max_time: self.time,
            max_depth: self.depth,
            full_graph: self.full_graph,
            hard_stop: self.hard_stop,
            strict: self.strict,
            non_interactive: self.non_interactive,
            proxy_server: self.proxy_server.clone(),
            proxy_username: self.proxy_username.clone(),
            proxy_password: self.proxy_password.clone(),
            output_dir: self.output_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Everything is validated before any network activity
    let seed = parse_seed(&cli.url)?;
    let config = resolve_config(cli.config.as_deref(), &cli.overrides()).with_context(|| {
        match &cli.config {
            Some(path) => format!("Invalid configuration ({})", path.display()),
            None => "Invalid arguments".to_string(),
        }
    })?;

    handle_crawl(&config, &seed, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawly=info,warn"),
            1 => EnvFilter::new("crawly=debug,info"),
            2 => EnvFilter::new("crawly=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn print_banner(config: &Config, seed: &Url) {
    println!("Starting crawler with the following settings:");
    println!("  Method: {}", config.crawler.method);
    println!("  Max Time: {}s", config.crawler.max_time);
    println!("  Max Depth: {}", config.crawler.max_depth);
    println!("  Start URL: {}", seed);
    println!("  Full Graph: {}", config.crawler.full_graph);
    println!();
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seed: &Url, quiet: bool) -> anyhow::Result<()> {
    let progress: Option<ProgressCallback> = if quiet {
        None
    } else {
        print_banner(config, seed);
        println!("HH:MM:SS | Depth");
        Some(Arc::new(|elapsed: Duration, depth: u32| {
            println!("{} | {}", format_elapsed(elapsed), depth);
        }))
    };

    let run = match crawl(config, seed, progress).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !quiet {
        println!();
        print_statistics(&run.report.stats);
        println!();
        println!("Results saved to {}", run.artifacts.table.display());
        if let Some(graph) = &run.artifacts.graph {
            println!("Graph saved to {}", graph.display());
        }
    }

    tracing::info!("Crawl {} completed successfully", run.run_id);
    Ok(())
}
