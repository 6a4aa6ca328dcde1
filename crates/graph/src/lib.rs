//! # Apéry Graph
//!
//! Numerical semigroups, their Apéry sets, the graphs built on them, and the
//! exact security number of those graphs.
//!
//! ## Pipeline
//!
//! ```text
//! generators
//!     │
//!     ├──> Semigroup (additive closure up to a safety bound)
//!     │
//!     ├──> Apéry set (smallest member of each residue class mod m)
//!     │
//!     ├──> Apéry graph (petgraph)
//!     │      ├─ Nodes: Apéry elements
//!     │      └─ Edges: pairs whose difference lies in the semigroup
//!     │
//!     └──> Security number
//!            ├─ Candidates by increasing size, lexicographic within a size
//!            ├─ Every non-empty sub-attack checked on closed neighborhoods
//!            └─ First secure candidate wins
//! ```
//!
//! Every stage is a pure function of its inputs; [`analyze`] runs them all.

mod analyze;
mod apery;
mod builder;
mod connectivity;
mod error;
mod graph;
mod security;
mod semigroup;
mod subsets;
mod types;

pub use analyze::{analyze, analyze_with, Analysis, AnalysisConfig, Derivation, SAMPLE_EDGES};
pub use apery::AperySet;
pub use builder::AperyGraphBuilder;
pub use connectivity::vertex_connectivity;
pub use error::{AnalysisError, Result};
pub use security::{
    is_secure, SecurityNumberSolver, SecurityOutcome, SolverConfig,
    DEFAULT_PARALLEL_MIN_CANDIDATES,
};
pub use semigroup::{Semigroup, DEFAULT_CLOSURE_BOUND, MAX_CLOSURE_BOUND};
pub use subsets::MAX_MASK_VERTICES;
pub use types::{AperyEdge, AperyGraph, Generators};
