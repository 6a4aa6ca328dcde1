//! Exact security number by exhaustive search.
//!
//! A vertex set `S'` is *secure* when every non-empty `X ⊆ S'` satisfies
//! `|N[X] ∩ S'| ≥ |N[X] \ S'|`. The security number is the smallest size of a
//! secure set. Candidates are tried by increasing size and, within a size, in
//! lexicographic order over vertex indices (ascending vertex values); the
//! first secure candidate wins. That order is part of the result: among
//! equally small secure sets the lexicographically first one is returned,
//! whether or not the scan runs in parallel.

use crate::error::{AnalysisError, Result};
use crate::graph::neighborhood_mask;
use crate::subsets::{self, Combinations};
use crate::types::AperyGraph;
use rayon::prelude::*;
use serde::Serialize;

/// Default number of candidates per batch at which evaluation goes parallel.
pub const DEFAULT_PARALLEL_MIN_CANDIDATES: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Candidates are evaluated in batches of this size; full batches are
    /// scanned with rayon, shorter ones sequentially.
    pub parallel_min_candidates: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel_min_candidates: DEFAULT_PARALLEL_MIN_CANDIDATES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityOutcome {
    /// `None` only for the empty graph.
    pub security_number: Option<usize>,
    /// Ascending vertex values; empty when undefined.
    pub secure_set: Vec<u64>,
}

pub struct SecurityNumberSolver {
    config: SolverConfig,
}

impl SecurityNumberSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, graph: &AperyGraph) -> Result<SecurityOutcome> {
        let n = graph.node_count();
        if n == 0 {
            return Ok(SecurityOutcome {
                security_number: None,
                secure_set: Vec::new(),
            });
        }

        let closed = graph.closed_neighborhood_masks()?;
        let batch_len = self.config.parallel_min_candidates.max(1);

        for size in 1..=n {
            log::debug!(
                "Security search: size {} ({} candidates)",
                size,
                subsets::binomial(n, size)
            );

            let mut candidates = Combinations::new(n, size);
            loop {
                let batch: Vec<u64> = candidates.by_ref().take(batch_len).collect();
                if batch.is_empty() {
                    break;
                }

                // find_first keeps the earliest secure candidate of the batch,
                // and batches are visited in enumeration order.
                let found = if batch.len() >= self.config.parallel_min_candidates {
                    batch
                        .par_iter()
                        .copied()
                        .find_first(|&candidate| is_secure_mask(&closed, candidate))
                } else {
                    batch
                        .iter()
                        .copied()
                        .find(|&candidate| is_secure_mask(&closed, candidate))
                };

                if let Some(mask) = found {
                    let secure_set = graph.values_of(mask);
                    log::debug!("Secure set of size {}: {:?}", size, secure_set);
                    return Ok(SecurityOutcome {
                        security_number: Some(size),
                        secure_set,
                    });
                }
            }
        }

        Err(AnalysisError::SearchExhausted { vertices: n })
    }
}

impl Default for SecurityNumberSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Whether the given vertex values form a secure set of `graph`.
pub fn is_secure(graph: &AperyGraph, candidate: &[u64]) -> Result<bool> {
    let closed = graph.closed_neighborhood_masks()?;
    let mask = graph.mask_of(candidate)?;
    Ok(is_secure_mask(&closed, mask))
}

pub(crate) fn is_secure_mask(closed: &[u64], candidate: u64) -> bool {
    subsets::non_empty_submasks(candidate).all(|attacked| {
        let hood = neighborhood_mask(closed, attacked);
        let defenders = (hood & candidate).count_ones();
        let attackers = (hood & !candidate).count_ones();
        defenders >= attackers
    })
}
