use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Incomplete closure: no representative found for residue {residue} mod {modulus} \
         within bound {bound}"
    )]
    IncompleteClosure {
        residue: u64,
        modulus: u64,
        bound: u64,
    },

    #[error("Search exhausted: no secure set found among {vertices} vertices")]
    SearchExhausted { vertices: usize },

    #[error("Graph too large: {vertices} vertices exceeds the exact search limit of {limit}")]
    GraphTooLarge { vertices: usize, limit: usize },
}

impl AnalysisError {
    /// Stable tag used by adapters when reporting the failure.
    pub const fn kind(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput(_) => "invalid_input",
            AnalysisError::IncompleteClosure { .. } => "incomplete_closure",
            AnalysisError::SearchExhausted { .. } => "search_exhausted",
            AnalysisError::GraphTooLarge { .. } => "graph_too_large",
        }
    }
}
