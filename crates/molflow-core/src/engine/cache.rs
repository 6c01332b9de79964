use crate::core::models::graph::MoleculeGraph;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::trace;

/// Number of layouts kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 8;

/// Normalized layouts keyed by the notation string they were computed from.
///
/// Entries are immutable once inserted and shared as `Arc`s, so a frame can keep
/// projecting a graph while a newer layout replaces it in the cache. The cache holds at
/// most `capacity` layouts and evicts the least recently used one first.
#[derive(Debug, Clone)]
pub struct LayoutCache {
    data: HashMap<String, Arc<MoleculeGraph>>,
    recency: VecDeque<String>,
    capacity: usize,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that keeps at most `capacity` layouts (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: HashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn insert(&mut self, input: &str, graph: MoleculeGraph) -> Arc<MoleculeGraph> {
        let graph = Arc::new(graph);
        self.insert_shared(input, Arc::clone(&graph));
        graph
    }

    pub fn insert_shared(&mut self, input: &str, graph: Arc<MoleculeGraph>) {
        if self.data.insert(input.to_string(), graph).is_some() {
            self.touch(input);
            return;
        }
        self.recency.push_back(input.to_string());
        while self.recency.len() > self.capacity {
            if let Some(evicted) = self.recency.pop_front() {
                self.data.remove(&evicted);
                trace!(input = %evicted, "Evicted least recently used layout.");
            }
        }
    }

    /// Looks up `input` and marks it as most recently used.
    pub fn get(&mut self, input: &str) -> Option<Arc<MoleculeGraph>> {
        let graph = self.data.get(input).cloned()?;
        self.touch(input);
        Some(graph)
    }

    /// Returns the cached layout for `input`, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, input: &str, compute: F) -> Arc<MoleculeGraph>
    where
        F: FnOnce() -> MoleculeGraph,
    {
        if let Some(graph) = self.get(input) {
            return graph;
        }
        self.insert(input, compute())
    }

    pub fn contains(&self, input: &str) -> bool {
        self.data.contains_key(input)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.recency.clear();
    }

    fn touch(&mut self, input: &str) {
        if let Some(index) = self.recency.iter().position(|key| key == input) {
            if let Some(key) = self.recency.remove(index) {
                self.recency.push_back(key);
            }
        }
    }
}
