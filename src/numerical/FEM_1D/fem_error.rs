//! Error type shared by the analytical solver, the finite element solver, the mesh search
//! and the task parser.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FemError {
    /// leading coefficient is zero, a coefficient is not finite or the interval is empty
    #[error("Invalid equation: {0}")]
    InvalidEquation(String),
    /// 2x2 system for integration constants or the assembled FEM matrix is (numerically) singular
    #[error("Singular system: {0}")]
    SingularSystem(String),
    /// both conditions were given for the same end of the interval
    #[error("Invalid boundary side: {0}")]
    InvalidBoundarySide(String),
    #[error(
        "No element count in {lower_bound}..{search_limit} gives max relative error {target} within {tolerance}"
    )]
    SearchExhausted {
        target: f64,
        tolerance: f64,
        lower_bound: usize,
        search_limit: usize,
    },
    #[error("Number of elements must be at least 1")]
    InvalidElementCount,
    /// solutions that should share nodes do not
    #[error("Mesh mismatch: {0}")]
    MeshMismatch(String),
    #[error("Task parsing error: {0}")]
    TaskParse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FemResult<T> = Result<T, FemError>;
