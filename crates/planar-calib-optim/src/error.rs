use crate::SolveStatus;
use planar_calib_core::Real;
use thiserror::Error;

/// Errors raised by the refinement problems.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimError {
    /// The solver stopped before a convergence criterion was met.
    ///
    /// `best_params` holds the parameter vector at termination.
    #[error("optimizer did not converge ({status:?}, {reason}) after {evaluations} evaluations; cost {cost:.6e}")]
    NotConverged {
        status: SolveStatus,
        reason: String,
        evaluations: usize,
        cost: Real,
        best_params: Vec<Real>,
    },
    #[error("need at least {needed} correspondences, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },
    #[error("{views} views but {observations} observation sets")]
    MismatchedViews { views: usize, observations: usize },
    #[error("observation set {view} has {got} points, expected {expected}")]
    MismatchedPoints {
        view: usize,
        expected: usize,
        got: usize,
    },
}
