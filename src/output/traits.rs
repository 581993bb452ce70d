//! Result sink traits and types
//!
//! This module defines the records a crawl produces and the trait interface
//! for whatever accumulates and persists them.

use crate::crawler::VisitedSet;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize graph data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Text of one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub url: String,
    pub text: String,
}

/// A hyperlink found on a fetched page
///
/// The destination may never have been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub destination: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Files written when a run is finalized
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Tabular export, always written
    pub table: PathBuf,

    /// Graph visualization, only written when more than one edge was recorded
    pub graph: Option<PathBuf>,
}

/// Trait for result sinks
///
/// A sink receives every page result and edge in the order the traversal
/// produces them and persists them once the run is over.
pub trait ResultSink {
    /// Records a successfully fetched page
    fn record_page(&mut self, page: PageResult) -> OutputResult<()>;

    /// Records a link relationship between pages
    fn record_edge(&mut self, edge: Edge) -> OutputResult<()>;

    /// Persists the run
    ///
    /// # Arguments
    ///
    /// * `run_id` - Base name for the written artifacts
    /// * `visited` - URLs fetched during the run, used to filter graph edges
    fn finalize(&mut self, run_id: &str, visited: &VisitedSet) -> OutputResult<Artifacts>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_new() {
        let edge = Edge::new("https://a.test/", String::from("https://b.test/"));
        assert_eq!(edge.source, "https://a.test/");
        assert_eq!(edge.destination, "https://b.test/");
    }

    #[test]
    fn test_page_result_serializes() {
        let page = PageResult {
            url: "https://a.test/".to_string(),
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"url":"https://a.test/","text":"Hello"}"#);
    }

    #[test]
    fn test_output_error_from_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = OutputError::from(io);
        assert!(matches!(err, OutputError::Io(_)));
        assert_eq!(err.to_string(), "IO error: denied");

        let json = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(matches!(OutputError::from(json), OutputError::Json(_)));
    }
}
