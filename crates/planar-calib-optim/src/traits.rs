use nalgebra::{DMatrix, DVector};
use planar_calib_core::Real;
use serde::{Deserialize, Serialize};

/// Generic non-linear least squares problem with dense parameter/residual vectors.
pub trait NllsProblem {
    /// Number of parameters in the optimization vector.
    fn num_params(&self) -> usize;
    /// Number of residual rows in the problem.
    fn num_residuals(&self) -> usize;

    /// Residuals for the given parameters.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;
    /// Jacobian of [`Self::residuals`] (`num_residuals × num_params`).
    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Maximum number of solver iterations before termination.
    ///
    /// The LM backend follows the MINPACK convention and caps function
    /// evaluations at `max_iters * (n + 1)`.
    pub max_iters: usize,
    /// Relative tolerance on the objective (cost) reduction.
    pub ftol: Real,
    /// Orthogonality/gradient tolerance.
    pub gtol: Real,
    /// Relative tolerance on parameter updates.
    pub xtol: Real,
    /// Log the solver report at `info` level.
    pub verbose: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            ftol: 1e-10,
            gtol: 1e-10,
            xtol: 1e-10,
            verbose: false,
        }
    }
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// A convergence tolerance was met (or the residuals vanished).
    Converged,
    /// No further reduction of the cost was possible within machine precision.
    Stalled,
    /// The evaluation budget ran out first.
    BudgetExhausted,
    /// The solver hit non-finite values.
    NumericalFailure,
    /// The problem had no parameters, no residuals or inconsistent dimensions.
    InvalidProblem,
}

impl SolveStatus {
    /// Whether the parameters at termination can be used as a result.
    pub fn is_accepted(self) -> bool {
        matches!(self, SolveStatus::Converged | SolveStatus::Stalled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Number of residual evaluations.
    pub evaluations: usize,
    /// `½‖r‖²` at the initial parameters.
    pub initial_cost: Real,
    /// `½‖r‖²` at the returned parameters.
    pub final_cost: Real,
    pub status: SolveStatus,
    /// Backend-specific termination reason, for diagnostics.
    pub termination: String,
}

pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}
