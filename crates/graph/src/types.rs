use crate::error::{AnalysisError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

/// Validated generator set: sorted, deduplicated, strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Generators(Vec<u64>);

impl Generators {
    pub fn new(raw: impl IntoIterator<Item = i64>) -> Result<Self> {
        let mut values = Vec::new();
        for value in raw {
            if value <= 0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "generators must be positive integers, got {value}"
                )));
            }
            values.push(value as u64);
        }

        if values.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "generator set must not be empty".to_string(),
            ));
        }

        values.sort_unstable();
        values.dedup();
        Ok(Self(values))
    }

    /// Smallest generator; the Apéry reduction modulus.
    pub fn modulus(&self) -> u64 {
        self.0[0]
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Edge between two Apéry elements, `a < b`, weighted by their difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AperyEdge {
    pub a: u64,
    pub b: u64,
    pub weight: u64,
}

/// Undirected simple graph over an Apéry set.
///
/// Vertex `i` of the petgraph structure holds the `i`-th smallest Apéry
/// element, so node indices and the ascending vertex order coincide.
#[derive(Debug, Clone)]
pub struct AperyGraph {
    pub(crate) graph: UnGraph<u64, u64>,
    pub(crate) vertices: Vec<u64>,
    pub(crate) edges: Vec<AperyEdge>,
}

impl AperyGraph {
    /// Structural graph, for renderers and other external consumers.
    pub fn graph(&self) -> &UnGraph<u64, u64> {
        &self.graph
    }

    /// Vertex values in ascending order.
    pub fn vertices(&self) -> &[u64] {
        &self.vertices
    }

    /// Edges in pairwise scan order.
    pub fn edges(&self) -> &[AperyEdge] {
        &self.edges
    }

    /// First `limit` edges in scan order.
    pub fn sample_edges(&self, limit: usize) -> Vec<AperyEdge> {
        self.edges.iter().take(limit).copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Position of a vertex value in the ascending order
    pub fn index_of(&self, value: u64) -> Option<usize> {
        self.vertices.binary_search(&value).ok()
    }

    pub fn node(&self, value: u64) -> Option<NodeIndex> {
        self.index_of(value).map(NodeIndex::new)
    }
}
