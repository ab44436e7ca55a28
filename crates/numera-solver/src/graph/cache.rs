use std::{collections::HashMap, sync::Arc};

use numera_core::{Candidate, CandidateGrid};

use super::{LinkGraph, LinkRules};
use crate::chain::{Coloring, Polarity};

/// Graphs and colorings derived from the current grid.
///
/// Everything in the cache is built lazily on first use and stays valid until
/// [`GraphCache::invalidate`] is called, which the solver does after every commit.
#[derive(Debug, Clone, Default)]
pub struct GraphCache {
    graphs: Vec<Arc<LinkGraph>>,
    colorings: HashMap<(Candidate, Polarity), Arc<Coloring>>,
}

impl GraphCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the graph of `grid` under `rules`, building it if needed.
    ///
    /// `grid` must be the grid the cache has seen since the last invalidation.
    pub fn graph(&mut self, grid: &CandidateGrid, rules: LinkRules) -> Arc<LinkGraph> {
        if let Some(graph) = self.graphs.iter().find(|g| g.rules() == rules) {
            return Arc::clone(graph);
        }
        let graph = Arc::new(LinkGraph::build(grid, rules));
        self.graphs.push(Arc::clone(&graph));
        graph
    }

    /// Returns the propagation of one hypothesis over the standard graph of `grid`.
    pub fn coloring(
        &mut self,
        grid: &CandidateGrid,
        seed: Candidate,
        polarity: Polarity,
    ) -> Arc<Coloring> {
        if let Some(coloring) = self.colorings.get(&(seed, polarity)) {
            return Arc::clone(coloring);
        }
        let graph = self.graph(grid, LinkRules::STANDARD);
        let coloring = Arc::new(Coloring::propagate(grid, &graph, seed, polarity));
        self.colorings.insert((seed, polarity), Arc::clone(&coloring));
        coloring
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty() && self.colorings.is_empty()
    }

    /// Drops everything. Call after any change to the grid.
    pub fn invalidate(&mut self) {
        if !self.is_empty() {
            log::trace!(
                "invalidating {} graphs and {} colorings",
                self.graphs.len(),
                self.colorings.len()
            );
        }
        self.graphs.clear();
        self.colorings.clear();
    }
}
