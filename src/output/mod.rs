//! Output module for persisting crawl results
//!
//! This module handles:
//! - Collecting page text and link edges during a crawl
//! - Exporting page text as CSV
//! - Rendering the link graph as an interactive HTML page
//! - Recording and printing run statistics

mod graph;
mod html;
mod sink;
pub mod stats;
mod tabular;
mod traits;

pub use graph::{LinkGraph, Point};
pub use html::{escape_html, render_html};
pub use sink::ArtifactSink;
pub use stats::{format_elapsed, print_statistics, CrawlStatistics};
pub use tabular::{save_csv, write_csv, CSV_HEADERS};
pub use traits::{Artifacts, Edge, OutputError, OutputResult, PageResult, ResultSink};

use chrono::{DateTime, TimeZone};

/// Format of run identifiers, used as artifact file stems
pub const RUN_ID_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";

/// Names a run after its start time, e.g. `31-12-2024_23-59-07`
pub fn run_id<Tz>(started_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    started_at.format(RUN_ID_FORMAT).to_string()
}
