//! Frontier and visited-set bookkeeping
//!
//! The frontier is the ordered collection of `(url, depth)` candidates that
//! drives a traversal: a FIFO queue for breadth-first crawls, a LIFO stack
//! for depth-first crawls.

use crate::config::SearchMethod;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,

    /// Distance from the seed (seed is 0)
    pub depth: u32,
}

impl FrontierEntry {
    pub fn seed(url: Url) -> Self {
        Self { url, depth: 0 }
    }

    /// Creates the entry for a link discovered on this entry's page
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            depth: self.depth + 1,
        }
    }
}

/// Pending entries, ordered by traversal method
#[derive(Debug, Clone)]
pub enum Frontier {
    Queue(VecDeque<FrontierEntry>),
    Stack(Vec<FrontierEntry>),
}

impl Frontier {
    pub fn for_method(method: SearchMethod) -> Self {
        match method {
            SearchMethod::BreadthFirst => Self::Queue(VecDeque::new()),
            SearchMethod::DepthFirst => Self::Stack(Vec::new()),
        }
    }

    pub fn push(&mut self, entry: FrontierEntry) {
        match self {
            Self::Queue(queue) => queue.push_back(entry),
            Self::Stack(stack) => stack.push(entry),
        }
    }

    /// Adds the children of one page
    ///
    /// Children are popped in discovery order for both methods: a stack
    /// receives them reversed so the first link is explored first.
    pub fn extend_children(&mut self, children: Vec<FrontierEntry>) {
        match self {
            Self::Queue(queue) => queue.extend(children),
            Self::Stack(stack) => stack.extend(children.into_iter().rev()),
        }
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        match self {
            Self::Queue(queue) => queue.pop_front(),
            Self::Stack(stack) => stack.pop(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Queue(queue) => queue.len(),
            Self::Stack(stack) => stack.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the frontier, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.len();
        match self {
            Self::Queue(queue) => queue.clear(),
            Self::Stack(stack) => stack.clear(),
        }
        dropped
    }
}

/// URLs already claimed by a fetch during this run
///
/// Grows monotonically and is the only deduplication mechanism: URLs are
/// compared exactly as resolved.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
