//! Non-linear refinement for planar camera calibration.
//!
//! The crate is organized around a small least-squares abstraction
//! ([`NllsProblem`]) solved by a Levenberg–Marquardt backend ([`LmBackend`]):
//!
//! - [`problems::homography`]: refine a plane homography over its nine entries,
//! - [`problems::planar_intrinsics`]: jointly refine the camera and every view,
//!   with a pluggable [`JacobianStrategy`] (analytic or numeric).
//!
//! A solve that runs out of budget or fails numerically is reported as
//! [`OptimError::NotConverged`], which still carries the parameters reached.

mod backend_lm;
mod error;
mod jacobian;
pub mod math;
pub mod params;
pub mod problems;
mod traits;

pub use backend_lm::LmBackend;
pub use error::OptimError;
pub use jacobian::{AnalyticJacobian, JacobianStrategy, NumericJacobian};
pub use problems::homography::{refine_homography, HomographyRefinement};
pub use problems::planar_intrinsics::{
    refine_calibration, CalibrationRefinement, PlanarCalibrationProblem,
};
pub use traits::{NllsProblem, NllsSolverBackend, SolveOptions, SolveReport, SolveStatus};

use nalgebra::DVector;
use planar_calib_core::Real;

/// Turn a solver report into an error unless its parameters are usable.
pub(crate) fn check_report(report: &SolveReport, x: &DVector<Real>) -> Result<(), OptimError> {
    if !report.status.is_accepted() {
        return Err(OptimError::NotConverged {
            status: report.status,
            reason: report.termination.clone(),
            evaluations: report.evaluations,
            cost: report.final_cost,
            best_params: x.iter().copied().collect(),
        });
    }
    if report.status == SolveStatus::Stalled {
        log::warn!(
            "optimizer stalled after {} evaluations ({}); accepting cost {:.6e}",
            report.evaluations,
            report.termination,
            report.final_cost
        );
    }
    Ok(())
}
