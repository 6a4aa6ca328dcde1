use crate::apery::AperySet;
use crate::semigroup::Semigroup;
use crate::types::{AperyEdge, AperyGraph};
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};

/// Builds the Apéry graph: one vertex per Apéry element, and an edge between
/// two elements whenever their difference lies in the semigroup.
pub struct AperyGraphBuilder<'a> {
    semigroup: &'a Semigroup,
}

impl<'a> AperyGraphBuilder<'a> {
    pub fn new(semigroup: &'a Semigroup) -> Self {
        Self { semigroup }
    }

    pub fn build(&self, apery: &AperySet) -> AperyGraph {
        let vertices = apery.elements().to_vec();
        let mut graph = UnGraph::with_capacity(vertices.len(), 0);

        // Phase 1: nodes, in ascending order so NodeIndex(i) is the i-th element
        for &value in &vertices {
            graph.add_node(value);
        }

        // Phase 2: pairwise scan, outer index ascending then inner index ascending
        let mut edges = Vec::new();
        for ((i, &a), (j, &b)) in vertices.iter().enumerate().tuple_combinations() {
            let weight = a.abs_diff(b);
            if self.semigroup.contains(weight) {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
                edges.push(AperyEdge { a, b, weight });
            }
        }

        log::debug!(
            "Built Apéry graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        AperyGraph {
            graph,
            vertices,
            edges,
        }
    }
}
