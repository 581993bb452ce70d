//! Link graph construction and force-directed layout

use crate::crawler::VisitedSet;
use crate::output::traits::Edge;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashMap;

/// Number of Fruchterman–Reingold iterations
const LAYOUT_ITERATIONS: usize = 50;

/// Closest distance two nodes are treated as having
const MIN_DISTANCE: f64 = 0.01;

/// Position of a node in layout space, within [-1, 1] on both axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Directed graph of crawled links
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    /// Builds the graph from recorded edges
    ///
    /// With `full_graph` every edge is kept; otherwise only edges whose both
    /// endpoints were visited. Repeated edges collapse into one.
    pub fn from_edges(edges: &[Edge], visited: &VisitedSet, full_graph: bool) -> Self {
        let mut graph = Self::default();

        for edge in edges {
            if !full_graph
                && !(visited.contains(&edge.source) && visited.contains(&edge.destination))
            {
                continue;
            }
            graph.add_edge(&edge.source, &edge.destination);
        }

        graph
    }

    pub fn add_edge(&mut self, source: &str, destination: &str) {
        let a = self.node(source);
        let b = self.node(destination);
        self.graph.update_edge(a, b, ());
    }

    fn node(&mut self, url: &str) -> NodeIndex {
        if let Some(index) = self.index.get(url) {
            return *index;
        }
        let index = self.graph.add_node(url.to_string());
        self.index.insert(url.to_string(), index);
        index
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node labels, in node-index order
    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|index| self.graph[index].as_str())
            .collect()
    }

    /// Edges as node-index pairs
    pub fn edge_indices(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect()
    }

    pub fn contains_edge(&self, source: &str, destination: &str) -> bool {
        match (self.index.get(source), self.index.get(destination)) {
            (Some(a), Some(b)) => self.graph.contains_edge(*a, *b),
            _ => false,
        }
    }

    /// Computes a Fruchterman–Reingold spring layout
    ///
    /// Positions are returned in node-index order and rescaled so the layout
    /// is centred on the origin and spans [-1, 1]. The same `seed` always
    /// gives the same layout for the same graph.
    pub fn spring_layout(&self, seed: u64) -> Vec<Point> {
        let n = self.node_count();
        match n {
            0 => return Vec::new(),
            1 => return vec![Point::default()],
            _ => {}
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions: Vec<Point> = (0..n)
            .map(|_| Point {
                x: rng.gen::<f64>(),
                y: rng.gen::<f64>(),
            })
            .collect();

        let links: Vec<(usize, usize)> = self
            .edge_indices()
            .into_iter()
            .filter(|(a, b)| a != b)
            .collect();

        // optimal pairwise distance for a unit area
        let k = (1.0 / n as f64).sqrt();
        let mut temperature = 0.1;
        let cooling = temperature / (LAYOUT_ITERATIONS as f64 + 1.0);

        for _ in 0..LAYOUT_ITERATIONS {
            let mut displacement = vec![Point::default(); n];

            for i in 0..n {
                for j in (i + 1)..n {
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let force = k * k / distance;
                    let (fx, fy) = (dx / distance * force, dy / distance * force);
                    displacement[i].x += fx;
                    displacement[i].y += fy;
                    displacement[j].x -= fx;
                    displacement[j].y -= fy;
                }
            }

            for &(a, b) in &links {
                let dx = positions[a].x - positions[b].x;
                let dy = positions[a].y - positions[b].y;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = distance * distance / k;
                let (fx, fy) = (dx / distance * force, dy / distance * force);
                displacement[a].x -= fx;
                displacement[a].y -= fy;
                displacement[b].x += fx;
                displacement[b].y += fy;
            }

            for (position, delta) in positions.iter_mut().zip(&displacement) {
                let length = (delta.x * delta.x + delta.y * delta.y)
                    .sqrt()
                    .max(MIN_DISTANCE);
                let step = length.min(temperature);
                position.x += delta.x / length * step;
                position.y += delta.y / length * step;
            }

            temperature -= cooling;
        }

        rescale(&mut positions);
        positions
    }
}

/// Centres positions on the origin and scales the largest coordinate to 1
fn rescale(positions: &mut [Point]) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;

    let mut extent: f64 = 0.0;
    for p in positions.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        extent = extent.max(p.x.abs()).max(p.y.abs());
    }

    if extent > 0.0 {
        for p in positions.iter_mut() {
            p.x /= extent;
            p.y /= extent;
        }
    }
}
