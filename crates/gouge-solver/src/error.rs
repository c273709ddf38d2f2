//! Error types for the solver.

use thiserror::Error;

/// Per-edge-point failures. Recoverable: the model run records them and
/// continues with the next edge point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// No jig rotation in the valid range satisfies the tangency condition.
    #[error("no jig rotation in range satisfies the tangency condition")]
    Unsolvable,

    /// The traced wheel curve stayed inside the bar for the whole sweep.
    #[error("grind curve never reached the bar surface within {steps} steps")]
    NoIntersection {
        /// Number of sweep steps taken before giving up.
        steps: usize,
    },
}

/// Run-level failures that abort a model computation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Invalid flute/edge profile or edge-curve construction failure.
    #[error(transparent)]
    Edge(#[from] gouge_edge::EdgeError),

    /// Invalid jig configuration.
    #[error(transparent)]
    Jig(#[from] gouge_jig::JigError),

    /// Invalid wheel configuration.
    #[error("wheel diameter must be positive, got {0}")]
    InvalidWheel(f64),

    /// Too few edge sample points for a meaningful profile.
    #[error("need at least 3 edge samples, got {0}")]
    BadSampleCount(usize),

    /// Every edge point was unsolvable — distinct from partial failure,
    /// which is reported inside the returned profile.
    #[error("no edge point admits a grinding angle ({points} points, all unsolvable)")]
    AllPointsUnsolvable {
        /// Number of edge points attempted.
        points: usize,
    },
}

/// Result type for model-level operations.
pub type Result<T> = std::result::Result<T, ModelError>;
