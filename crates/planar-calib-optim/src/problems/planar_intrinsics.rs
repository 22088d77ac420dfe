//! Global refinement of a planar calibration.
//!
//! Jointly optimizes the camera (intrinsics + radial distortion) and every
//! view transform by minimizing the pixel reprojection error of all model
//! points in all views. See [`crate::params`] for the parameter layout.

use crate::params::ParamLayout;
use crate::{
    check_report, JacobianStrategy, LmBackend, NllsProblem, NllsSolverBackend, OptimError,
    SolveOptions, SolveReport,
};
use nalgebra::{DMatrix, DVector};
use planar_calib_core::{Camera, Pt2, Real, ViewTransform};

/// Residuals `projected − observed` for every point of every view, stacked
/// view by view as `(u, v)` pairs.
pub struct PlanarCalibrationProblem<'a> {
    model: &'a [Pt2],
    observed: DVector<Real>,
    layout: ParamLayout,
    strategy: &'a dyn JacobianStrategy,
}

impl<'a> PlanarCalibrationProblem<'a> {
    pub fn new(
        model: &'a [Pt2],
        observed: &[Vec<Pt2>],
        num_distortion: usize,
        strategy: &'a dyn JacobianStrategy,
    ) -> Result<Self, OptimError> {
        if let Some((view, obs)) = observed
            .iter()
            .enumerate()
            .find(|(_, obs)| obs.len() != model.len())
        {
            return Err(OptimError::MismatchedPoints {
                view,
                expected: model.len(),
                got: obs.len(),
            });
        }

        let layout = ParamLayout::new(num_distortion, observed.len());
        let rows = 2 * model.len() * observed.len();
        if observed.is_empty() || rows < layout.len() {
            return Err(OptimError::NotEnoughPoints {
                needed: layout.len().div_ceil(2),
                got: rows / 2,
            });
        }

        let observed = DVector::from_iterator(
            rows,
            observed.iter().flatten().flat_map(|p| [p.x, p.y]),
        );
        Ok(Self {
            model,
            observed,
            layout,
            strategy,
        })
    }

    pub fn layout(&self) -> ParamLayout {
        self.layout
    }

    pub fn model(&self) -> &[Pt2] {
        self.model
    }

    pub fn residual_dim(&self) -> usize {
        self.observed.len()
    }

    /// Projections of the model through one view, `(u₀, v₀, u₁, v₁, …)`.
    pub fn view_projections(&self, camera: &Camera, view: &ViewTransform) -> DVector<Real> {
        DVector::from_iterator(
            2 * self.model.len(),
            self.model.iter().flat_map(|p| {
                let uv = camera.project_planar(view, p);
                [uv.x, uv.y]
            }),
        )
    }

    /// Projections of the model through every view, in residual order.
    pub fn projections(&self, x: &DVector<Real>) -> DVector<Real> {
        let camera = self.layout.camera(x);
        let rows_per_view = 2 * self.model.len();
        let mut out = DVector::zeros(self.residual_dim());
        for v in 0..self.layout.num_views {
            let view = self.layout.view(x, v);
            out.rows_mut(v * rows_per_view, rows_per_view)
                .copy_from(&self.view_projections(&camera, &view));
        }
        out
    }
}

impl NllsProblem for PlanarCalibrationProblem<'_> {
    fn num_params(&self) -> usize {
        self.layout.len()
    }

    fn num_residuals(&self) -> usize {
        self.residual_dim()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        self.projections(x) - &self.observed
    }

    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
        self.strategy.jacobian(self, x)
    }
}

/// Refined camera and views with the solver report.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRefinement {
    pub camera: Camera,
    /// One per view, input order preserved.
    pub views: Vec<ViewTransform>,
    pub report: SolveReport,
}

/// Jointly refine `camera` and `views` against the observations.
///
/// `observed[v][i]` is the pixel of `model[i]` in view `v`. The number of
/// distortion coefficients is taken from `camera`.
pub fn refine_calibration(
    model: &[Pt2],
    observed: &[Vec<Pt2>],
    camera: &Camera,
    views: &[ViewTransform],
    strategy: &dyn JacobianStrategy,
    opts: &SolveOptions,
) -> Result<CalibrationRefinement, OptimError> {
    if views.len() != observed.len() {
        return Err(OptimError::MismatchedViews {
            views: views.len(),
            observations: observed.len(),
        });
    }
    let problem =
        PlanarCalibrationProblem::new(model, observed, camera.distortion.len(), strategy)?;
    let layout = problem.layout();
    log::debug!(
        "refining {} parameters over {} residuals ({} jacobian)",
        layout.len(),
        problem.residual_dim(),
        strategy.name()
    );

    let x0 = layout.pack(camera, views);
    let (x, report) = LmBackend.solve(&problem, x0, opts);
    check_report(&report, &x)?;

    Ok(CalibrationRefinement {
        camera: layout.camera(&x),
        views: layout.views(&x),
        report,
    })
}
