use crate::error::Result;
use crate::graph::neighborhood_mask;
use crate::subsets::{self, Combinations};
use crate::types::AperyGraph;

/// Vertex connectivity: the fewest vertices whose removal leaves a
/// disconnected graph (`n - 1` for complete graphs, `0` when the graph is
/// already disconnected or has at most one vertex).
///
/// This is a different quantity from the security number and is reported
/// under its own name.
pub fn vertex_connectivity(graph: &AperyGraph) -> Result<usize> {
    let n = graph.node_count();
    if n <= 1 {
        return Ok(0);
    }

    let closed = graph.closed_neighborhood_masks()?;
    let all = subsets::full_mask(n);

    for removed_count in 0..=n - 2 {
        let cut = Combinations::new(n, removed_count).any(|removed| {
            let remaining = all & !removed;
            !is_connected(&closed, remaining)
        });
        if cut {
            return Ok(removed_count);
        }
    }

    Ok(n - 1)
}

/// Whether the subgraph induced by `within` is connected.
fn is_connected(closed: &[u64], within: u64) -> bool {
    if within == 0 {
        return true;
    }
    let mut reached = within & within.wrapping_neg();
    loop {
        let next = neighborhood_mask(closed, reached) & within;
        if next == reached {
            return reached == within;
        }
        reached = next;
    }
}
