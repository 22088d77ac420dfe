//! Non-linear refinement of a plane homography.
//!
//! Minimizes the pixel distance between `H·x` and the observed image points
//! over the nine entries of `H`. The overall scale of `H` is a free gauge;
//! the damping of LM keeps it bounded and the result is rescaled to
//! `H[2][2] = 1` afterwards.

use crate::{LmBackend, NllsProblem, NllsSolverBackend, OptimError, SolveOptions, SolveReport};
use nalgebra::{DMatrix, DVector};
use planar_calib_core::{normalize_homography, Mat3, Pt2, Real};

/// Residuals `H·xᵢ − x'ᵢ` stacked as `(u₀, v₀, u₁, v₁, …)`.
#[derive(Debug, Clone, Copy)]
pub struct HomographyProblem<'a> {
    model: &'a [Pt2],
    image: &'a [Pt2],
}

impl<'a> HomographyProblem<'a> {
    pub fn new(model: &'a [Pt2], image: &'a [Pt2]) -> Result<Self, OptimError> {
        if model.len() != image.len() {
            return Err(OptimError::MismatchedPoints {
                view: 0,
                expected: model.len(),
                got: image.len(),
            });
        }
        if model.len() < 4 {
            return Err(OptimError::NotEnoughPoints {
                needed: 4,
                got: model.len(),
            });
        }
        Ok(Self { model, image })
    }
}

fn unpack(x: &DVector<Real>) -> Mat3 {
    Mat3::from_row_slice(x.as_slice())
}

impl NllsProblem for HomographyProblem<'_> {
    fn num_params(&self) -> usize {
        9
    }

    fn num_residuals(&self) -> usize {
        2 * self.model.len()
    }

    fn residuals(&self, x: &DVector<Real>) -> DVector<Real> {
        let h = unpack(x);
        let mut r = DVector::zeros(self.num_residuals());
        for (i, (p, q)) in self.model.iter().zip(self.image).enumerate() {
            let w = h[(2, 0)] * p.x + h[(2, 1)] * p.y + h[(2, 2)];
            r[2 * i] = (h[(0, 0)] * p.x + h[(0, 1)] * p.y + h[(0, 2)]) / w - q.x;
            r[2 * i + 1] = (h[(1, 0)] * p.x + h[(1, 1)] * p.y + h[(1, 2)]) / w - q.y;
        }
        r
    }

    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
        let h = unpack(x);
        let mut j = DMatrix::zeros(self.num_residuals(), 9);
        for (i, p) in self.model.iter().enumerate() {
            let w = h[(2, 0)] * p.x + h[(2, 1)] * p.y + h[(2, 2)];
            let u = (h[(0, 0)] * p.x + h[(0, 1)] * p.y + h[(0, 2)]) / w;
            let v = (h[(1, 0)] * p.x + h[(1, 1)] * p.y + h[(1, 2)]) / w;
            let m = [p.x / w, p.y / w, 1.0 / w];

            let (ru, rv) = (2 * i, 2 * i + 1);
            for c in 0..3 {
                j[(ru, c)] = m[c];
                j[(rv, 3 + c)] = m[c];
                j[(ru, 6 + c)] = -u * m[c];
                j[(rv, 6 + c)] = -v * m[c];
            }
        }
        j
    }
}

/// Refined homography and the solver report.
#[derive(Debug, Clone, PartialEq)]
pub struct HomographyRefinement {
    /// Refined `H`, scaled so that `H[2][2] = 1`.
    pub homography: Mat3,
    pub report: SolveReport,
}

/// Refine `h0` so that it maps `model` onto `image` with minimal pixel error.
pub fn refine_homography(
    model: &[Pt2],
    image: &[Pt2],
    h0: &Mat3,
    opts: &SolveOptions,
) -> Result<HomographyRefinement, OptimError> {
    let problem = HomographyProblem::new(model, image)?;
    let x0 = DVector::from_row_slice(normalize_homography(h0).transpose().as_slice());

    let (x, report) = LmBackend.solve(&problem, x0, opts);
    crate::check_report(&report, &x)?;

    Ok(HomographyRefinement {
        homography: normalize_homography(&unpack(&x)),
        report,
    })
}
