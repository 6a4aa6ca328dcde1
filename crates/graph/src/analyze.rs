use crate::apery::AperySet;
use crate::builder::AperyGraphBuilder;
use crate::error::Result;
use crate::security::{SecurityNumberSolver, SolverConfig};
use crate::semigroup::{Semigroup, DEFAULT_CLOSURE_BOUND};
use crate::types::{AperyEdge, AperyGraph, Generators};
use serde::Serialize;

/// Number of edges reported in [`Analysis::sample_edges`].
pub const SAMPLE_EDGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Safety ceiling for the semigroup closure.
    pub closure_bound: u64,
    pub solver: SolverConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            closure_bound: DEFAULT_CLOSURE_BOUND,
            solver: SolverConfig::default(),
        }
    }
}

/// Everything derived from a generator set short of the security search.
#[derive(Debug, Clone)]
pub struct Derivation {
    pub generators: Generators,
    pub semigroup: Semigroup,
    pub apery: AperySet,
    pub graph: AperyGraph,
}

impl Derivation {
    /// Semigroup, Apéry set and Apéry graph, in that order.
    pub fn derive(raw: &[i64], closure_bound: u64) -> Result<Self> {
        let generators = Generators::new(raw.iter().copied())?;
        let semigroup = Semigroup::generate(&generators, closure_bound)?;
        let apery = AperySet::compute(&semigroup, generators.modulus())?;
        let graph = AperyGraphBuilder::new(&semigroup).build(&apery);

        Ok(Self {
            generators,
            semigroup,
            apery,
            graph,
        })
    }

    pub fn modulus(&self) -> u64 {
        self.apery.modulus()
    }

    /// Run the exact security search and assemble the full result.
    pub fn solve(&self, solver: &SolverConfig) -> Result<Analysis> {
        let outcome = SecurityNumberSolver::new(*solver).solve(&self.graph)?;

        Ok(Analysis {
            generators: self.generators.as_slice().to_vec(),
            modulus: self.modulus(),
            apery_set: self.apery.elements().to_vec(),
            num_nodes: self.graph.node_count(),
            num_edges: self.graph.edge_count(),
            security_number: outcome.security_number,
            secure_set: outcome.secure_set,
            sample_edges: self.graph.sample_edges(SAMPLE_EDGES),
        })
    }
}

/// Structured result of analysing one generator set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Sorted, deduplicated.
    pub generators: Vec<u64>,
    pub modulus: u64,
    /// Ascending.
    pub apery_set: Vec<u64>,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub security_number: Option<usize>,
    /// Ascending; empty when the security number is undefined.
    pub secure_set: Vec<u64>,
    /// Leading edges of the pairwise scan.
    pub sample_edges: Vec<AperyEdge>,
}

/// Analyse a generator set with the default configuration.
pub fn analyze(generators: &[i64]) -> Result<Analysis> {
    analyze_with(generators, &AnalysisConfig::default())
}

pub fn analyze_with(generators: &[i64], config: &AnalysisConfig) -> Result<Analysis> {
    let derivation = Derivation::derive(generators, config.closure_bound)?;
    let analysis = derivation.solve(&config.solver)?;

    log::info!(
        "Analysed <{}>: m={}, {} nodes, {} edges, security number {}",
        analysis
            .generators
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        analysis.modulus,
        analysis.num_nodes,
        analysis.num_edges,
        analysis
            .security_number
            .map_or_else(|| "undefined".to_string(), |s| s.to_string())
    );

    Ok(analysis)
}
