//! The recipe co-occurrence graph and minimal read adapters.

use std::collections::BTreeMap;

use crate::error::{GraphError, Result};

pub trait Graph {
    fn node_count(&self) -> usize;
    fn neighbors(&self, node: usize) -> Vec<usize>;
    fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }
}

pub trait WeightedGraph: Graph {
    /// Weight of the edge between `source` and `target`, or `0.0` when there is none.
    fn edge_weight(&self, source: usize, target: usize) -> f64;
}

/// How an undirected edge is laid out in the per-recipe maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeStorage {
    /// One entry per pair, under `min(a, b)` keyed by `max(a, b)`.
    #[default]
    Canonical,
    /// Two entries per pair, one under each endpoint.
    Symmetric,
}

/// Sparse, undirected, weighted recipe x recipe adjacency.
///
/// Each recipe owns an ordered map from neighbor index to accumulated weight, so iterating a
/// row always yields neighbors in ascending order. Which neighbors a row holds depends on
/// [`EdgeStorage`]:
/// - `Canonical`: row `r` holds only neighbors `> r`.
/// - `Symmetric`: row `r` holds every neighbor.
///
/// [`RecipeGraph::edge_weight`] and the [`Graph`] adapters hide the difference.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeGraph {
    storage: EdgeStorage,
    adjacency: Vec<BTreeMap<usize, f64>>,
}

impl RecipeGraph {
    pub fn new(num_recipes: usize, storage: EdgeStorage) -> Result<Self> {
        let mut adjacency = Vec::new();
        adjacency
            .try_reserve_exact(num_recipes)
            .map_err(|_| GraphError::Allocation { what: "adjacency rows", requested: num_recipes })?;
        adjacency.resize_with(num_recipes, BTreeMap::new);
        Ok(Self { storage, adjacency })
    }

    pub fn storage(&self) -> EdgeStorage {
        self.storage
    }

    pub fn num_recipes(&self) -> usize {
        self.adjacency.len()
    }

    /// Add `weight` to the undirected edge `(a, b)`, creating it if needed.
    ///
    /// Callers guarantee `a != b` and both in range.
    pub(crate) fn add_weight(&mut self, a: usize, b: usize, weight: f64) {
        debug_assert_ne!(a, b, "self-loop on recipe {a}");
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        *self.adjacency[lo].entry(hi).or_insert(0.0) += weight;
        if self.storage == EdgeStorage::Symmetric {
            *self.adjacency[hi].entry(lo).or_insert(0.0) += weight;
        }
    }

    /// Accumulated weight of `(a, b)` in either order, `None` if the recipes never co-occur.
    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.adjacency.get(lo)?.get(&hi).copied()
    }

    /// The stored row for `recipe`: the entries that get printed on its output line.
    pub fn row(&self, recipe: usize) -> &BTreeMap<usize, f64> {
        &self.adjacency[recipe]
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &BTreeMap<usize, f64>)> + '_ {
        self.adjacency.iter().enumerate()
    }

    /// Every `(neighbor, weight)` of `recipe`, ascending by neighbor.
    ///
    /// Under canonical storage this scans all lower-indexed rows.
    pub fn neighbors_with_weights(&self, recipe: usize) -> Vec<(usize, f64)> {
        match self.storage {
            EdgeStorage::Symmetric => self.adjacency[recipe].iter().map(|(&n, &w)| (n, w)).collect(),
            EdgeStorage::Canonical => {
                let mut out: Vec<(usize, f64)> = self.adjacency[..recipe]
                    .iter()
                    .enumerate()
                    .filter_map(|(lo, row)| row.get(&recipe).map(|&w| (lo, w)))
                    .collect();
                out.extend(self.adjacency[recipe].iter().map(|(&n, &w)| (n, w)));
                out
            }
        }
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.adjacency.iter().map(BTreeMap::len).sum();
        match self.storage {
            EdgeStorage::Canonical => stored,
            EdgeStorage::Symmetric => stored / 2,
        }
    }

    /// Re-layout into `storage`, keeping every weight.
    pub fn into_storage(self, storage: EdgeStorage) -> Self {
        if storage == self.storage {
            return self;
        }
        let n = self.adjacency.len();
        let mut adjacency: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for (r, row) in self.adjacency.into_iter().enumerate() {
            for (nb, w) in row {
                match storage {
                    EdgeStorage::Canonical => {
                        if r < nb {
                            adjacency[r].insert(nb, w);
                        }
                    }
                    EdgeStorage::Symmetric => {
                        adjacency[r].insert(nb, w);
                        adjacency[nb].insert(r, w);
                    }
                }
            }
        }
        Self { storage, adjacency }
    }

    /// Convert to an undirected `petgraph` graph; node `i` is recipe `i`.
    #[cfg(feature = "petgraph")]
    pub fn to_petgraph(&self) -> petgraph::Graph<(), f64, petgraph::Undirected> {
        use petgraph::graph::NodeIndex;

        let mut g = petgraph::Graph::with_capacity(self.num_recipes(), self.edge_count());
        for _ in 0..self.num_recipes() {
            g.add_node(());
        }
        for (r, row) in self.rows() {
            for (&nb, &w) in row.range(r + 1..) {
                g.add_edge(NodeIndex::new(r), NodeIndex::new(nb), w);
            }
        }
        g
    }
}

impl Graph for RecipeGraph {
    fn node_count(&self) -> usize {
        self.num_recipes()
    }
    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.neighbors_with_weights(node).into_iter().map(|(n, _)| n).collect()
    }
}

impl WeightedGraph for RecipeGraph {
    fn edge_weight(&self, source: usize, target: usize) -> f64 {
        RecipeGraph::edge_weight(self, source, target).unwrap_or(0.0)
    }
}
