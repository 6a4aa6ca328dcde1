use crate::error::{AnalysisError, Result};
use crate::subsets::{self, MAX_MASK_VERTICES};
use crate::types::AperyGraph;
use std::collections::BTreeSet;

impl AperyGraph {
    /// Neighbors of a vertex value, ascending. Empty for unknown values.
    pub fn neighbors(&self, value: u64) -> Vec<u64> {
        let Some(node) = self.node(value) else {
            return Vec::new();
        };
        let mut out: Vec<u64> = self
            .graph
            .neighbors(node)
            .map(|neighbor| self.graph[neighbor])
            .collect();
        out.sort_unstable();
        out
    }

    /// N[X]: the given vertices plus all of their neighbors. Values that are
    /// not vertices of the graph are ignored.
    pub fn closed_neighborhood(&self, set: &[u64]) -> BTreeSet<u64> {
        let mut out = BTreeSet::new();
        for &value in set {
            if self.index_of(value).is_none() {
                continue;
            }
            out.insert(value);
            out.extend(self.neighbors(value));
        }
        out
    }

    /// Per-vertex closed neighborhoods as bitmasks over vertex indices.
    pub(crate) fn closed_neighborhood_masks(&self) -> Result<Vec<u64>> {
        let n = self.node_count();
        if n > MAX_MASK_VERTICES {
            return Err(AnalysisError::GraphTooLarge {
                vertices: n,
                limit: MAX_MASK_VERTICES,
            });
        }

        let mut masks: Vec<u64> = (0..n).map(|i| 1u64 << i).collect();
        for edge in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(edge) {
                masks[a.index()] |= 1u64 << b.index();
                masks[b.index()] |= 1u64 << a.index();
            }
        }
        Ok(masks)
    }

    /// Translate vertex values into a bitmask; unknown values are an error.
    pub(crate) fn mask_of(&self, set: &[u64]) -> Result<u64> {
        if self.node_count() > MAX_MASK_VERTICES {
            return Err(AnalysisError::GraphTooLarge {
                vertices: self.node_count(),
                limit: MAX_MASK_VERTICES,
            });
        }
        set.iter().try_fold(0u64, |mask, &value| {
            self.index_of(value)
                .map(|i| mask | (1u64 << i))
                .ok_or_else(|| {
                    AnalysisError::InvalidInput(format!("{value} is not a vertex of the graph"))
                })
        })
    }

    pub(crate) fn values_of(&self, mask: u64) -> Vec<u64> {
        subsets::indices(mask).map(|i| self.vertices[i]).collect()
    }
}

/// N[X] for a subset mask, given per-vertex closed neighborhood masks.
pub(crate) fn neighborhood_mask(closed: &[u64], set: u64) -> u64 {
    subsets::indices(set).fold(0u64, |acc, i| acc | closed[i])
}
