//! Jacobian strategies for the calibration refinement.
//!
//! Both strategies fill the same sparsity pattern: for the two rows of a
//! point in view `v`, the dense camera columns and the six columns of view
//! `v`. Every other entry is zero.

use crate::math::projection::projection_jacobian;
use crate::problems::planar_intrinsics::PlanarCalibrationProblem;
use nalgebra::{DMatrix, DVector};
use planar_calib_core::{Real, VIEW_DIM};

/// Relative step of the forward differences, about `√ε` for `f64`.
const NUMERIC_STEP: Real = 1.5e-8;

/// Computes `∂(projected pixels) / ∂(parameters)` for a [`PlanarCalibrationProblem`].
pub trait JacobianStrategy {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Jacobian at `x`, `problem.num_residuals() × problem.num_params()`.
    fn jacobian(&self, problem: &PlanarCalibrationProblem<'_>, x: &DVector<Real>) -> DMatrix<Real>;
}

/// Closed-form per-point derivatives.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticJacobian;

impl JacobianStrategy for AnalyticJacobian {
    fn name(&self) -> &'static str {
        "analytic"
    }

    fn jacobian(&self, problem: &PlanarCalibrationProblem<'_>, x: &DVector<Real>) -> DMatrix<Real> {
        let layout = problem.layout();
        let camera = layout.camera(x);
        let cam_dim = layout.camera_dim();
        let n = problem.model().len();

        let mut j = DMatrix::zeros(problem.residual_dim(), layout.len());
        for v in 0..layout.num_views {
            let view = layout.view(x, v);
            let offset = layout.view_offset(v);
            for (i, p) in problem.model().iter().enumerate() {
                let row = 2 * (v * n + i);
                let pj = projection_jacobian(&camera, &view, p);
                j.view_mut((row, 0), (2, cam_dim)).copy_from(&pj.d_camera);
                j.view_mut((row, offset), (2, VIEW_DIM)).copy_from(&pj.d_view);
            }
        }
        j
    }
}

/// Forward differences with step `1.5e-8 · max(|xⱼ|, 1)`.
///
/// Camera columns need every residual; a view column only changes the rows
/// of its own view, so only those are re-evaluated.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericJacobian;

fn step(xj: Real) -> Real {
    // The perturbed coordinate is rounded; use the step actually taken.
    let h = NUMERIC_STEP * xj.abs().max(1.0);
    (xj + h) - xj
}

impl JacobianStrategy for NumericJacobian {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn jacobian(&self, problem: &PlanarCalibrationProblem<'_>, x: &DVector<Real>) -> DMatrix<Real> {
        let layout = problem.layout();
        let rows_per_view = 2 * problem.model().len();
        let r0 = problem.projections(x);

        let mut j = DMatrix::zeros(problem.residual_dim(), layout.len());
        let mut xp = x.clone();

        for c in 0..layout.camera_dim() {
            let h = step(x[c]);
            xp[c] = x[c] + h;
            let rp = problem.projections(&xp);
            j.set_column(c, &((rp - &r0) / h));
            xp[c] = x[c];
        }

        let camera = layout.camera(x);
        for v in 0..layout.num_views {
            let base = problem.view_projections(&camera, &layout.view(x, v));
            let row = v * rows_per_view;
            for c in layout.view_offset(v)..layout.view_offset(v + 1) {
                let h = step(x[c]);
                xp[c] = x[c] + h;
                let perturbed = problem.view_projections(&camera, &layout.view(&xp, v));
                j.view_mut((row, c), (rows_per_view, 1))
                    .copy_from(&((perturbed - &base) / h));
                xp[c] = x[c];
            }
        }
        j
    }
}
