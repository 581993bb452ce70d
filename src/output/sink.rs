//! In-memory result sink that persists to CSV and HTML on finalize

use crate::crawler::VisitedSet;
use crate::output::graph::LinkGraph;
use crate::output::html::render_html;
use crate::output::tabular::save_csv;
use crate::output::traits::{Artifacts, Edge, OutputResult, PageResult, ResultSink};
use std::fs;
use std::path::{Path, PathBuf};

/// Graph exports are only written above this many recorded edges
const MIN_GRAPH_EDGES: usize = 1;

/// Layout seed, fixed so the same crawl always draws the same picture
const LAYOUT_SEED: u64 = 42;

/// Collects page results and edges in memory, writing them out on finalize
#[derive(Debug)]
pub struct ArtifactSink {
    directory: PathBuf,
    full_graph: bool,
    results: Vec<PageResult>,
    edges: Vec<Edge>,
}

impl ArtifactSink {
    /// Creates a sink writing into `directory`
    ///
    /// # Arguments
    ///
    /// * `directory` - Where the artifacts are written; created if missing
    /// * `full_graph` - Keep edges to pages that were never fetched
    pub fn new(directory: impl Into<PathBuf>, full_graph: bool) -> Self {
        Self {
            directory: directory.into(),
            full_graph,
            results: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn results(&self) -> &[PageResult] {
        &self.results
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

impl ResultSink for ArtifactSink {
    fn record_page(&mut self, page: PageResult) -> OutputResult<()> {
        self.results.push(page);
        Ok(())
    }

    fn record_edge(&mut self, edge: Edge) -> OutputResult<()> {
        self.edges.push(edge);
        Ok(())
    }

    fn finalize(&mut self, run_id: &str, visited: &VisitedSet) -> OutputResult<Artifacts> {
        fs::create_dir_all(&self.directory)?;

        let table = self.directory.join(format!("{}.csv", run_id));
        save_csv(&table, &self.results)?;
        tracing::info!("Saved {} pages to {}", self.results.len(), table.display());

        if self.edges.len() <= MIN_GRAPH_EDGES {
            tracing::info!(
                "Skipping graph export: {} edge(s) recorded",
                self.edges.len()
            );
            return Ok(Artifacts { table, graph: None });
        }

        let graph = LinkGraph::from_edges(&self.edges, visited, self.full_graph);
        tracing::debug!(
            "Graph has {} nodes and {} edges (full graph: {})",
            graph.node_count(),
            graph.edge_count(),
            self.full_graph
        );

        let layout = graph.spring_layout(LAYOUT_SEED);
        let html = render_html(&graph, &layout, run_id)?;

        let path = self.directory.join(format!("{}.html", run_id));
        fs::write(&path, html)?;
        tracing::info!("Saved graph visualization to {}", path.display());

        Ok(Artifacts {
            table,
            graph: Some(path),
        })
    }
}
