//! Linear estimation of the radial distortion coefficients.
//!
//! With intrinsics and views fixed, the observed pixel of a model point is
//!
//! ```text
//! u_obs = u + (u − uc)·(k0·r² + k1·r⁴ + …)
//! v_obs = v + (v − vc)·(k0·r² + k1·r⁴ + …)
//! ```
//!
//! where `(u, v)` is the distortion-free projection and `r²` the squared
//! radius of its normalized (projection plane) coordinates. This is linear in
//! the coefficients, so all points of all views are stacked into `D·k = d`
//! and solved in the least-squares sense.
//!
//! This estimate is an **initialization**: it ignores the coupling between
//! distortion and the other parameters, which the global refinement resolves.

use nalgebra::{DMatrix, DVector};
use planar_calib_core::{
    solve_least_squares, Intrinsics, LinalgError, Pt2, RadialDistortion, Real, ViewTransform,
};
use thiserror::Error;

/// Errors raised by [`estimate_radial_distortion`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistortionFitError {
    #[error("{views} view transforms but {observations} observation sets")]
    MismatchedViews { views: usize, observations: usize },
    #[error("view {view} has {got} observations, expected {expected}")]
    MismatchedPoints {
        view: usize,
        expected: usize,
        got: usize,
    },
    #[error("need at least {needed} equations for {needed} coefficients, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },
    #[error("model point {point} projects behind the camera in view {view}")]
    PointBehindCamera { view: usize, point: usize },
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Fit `num_coefficients` radial coefficients `(k0, k1, …)`.
///
/// `views` and `observed` are index-corresponding; each observation set has
/// one pixel per model point. `num_coefficients == 0` returns an empty
/// distortion without solving anything.
pub fn estimate_radial_distortion(
    intrinsics: &Intrinsics,
    views: &[ViewTransform],
    model: &[Pt2],
    observed: &[Vec<Pt2>],
    num_coefficients: usize,
) -> Result<RadialDistortion, DistortionFitError> {
    if views.len() != observed.len() {
        return Err(DistortionFitError::MismatchedViews {
            views: views.len(),
            observations: observed.len(),
        });
    }
    if let Some((view, obs)) = observed
        .iter()
        .enumerate()
        .find(|(_, obs)| obs.len() != model.len())
    {
        return Err(DistortionFitError::MismatchedPoints {
            view,
            expected: model.len(),
            got: obs.len(),
        });
    }
    if num_coefficients == 0 {
        return Ok(RadialDistortion::zeros(0));
    }

    let rows = 2 * views.len() * model.len();
    if rows < num_coefficients {
        return Err(DistortionFitError::NotEnoughPoints {
            needed: num_coefficients,
            got: rows,
        });
    }

    let mut d = DMatrix::<Real>::zeros(rows, num_coefficients);
    let mut rhs = DVector::<Real>::zeros(rows);

    for (v_idx, (view, obs)) in views.iter().zip(observed).enumerate() {
        for (p_idx, (p, uv_obs)) in model.iter().zip(obs).enumerate() {
            let pc = view.apply_to(&planar_calib_core::planar_to_3d(p));
            if pc.z <= Real::EPSILON {
                return Err(DistortionFitError::PointBehindCamera {
                    view: v_idx,
                    point: p_idx,
                });
            }
            let xy = pc.xy().coords / pc.z;
            let r2 = xy.norm_squared();
            let uv = intrinsics.map_to_sensor_plane(&xy);
            let du = uv.x - intrinsics.uc;
            let dv = uv.y - intrinsics.vc;

            let row = 2 * (v_idx * model.len() + p_idx);
            let mut r_pow = r2;
            for k in 0..num_coefficients {
                d[(row, k)] = du * r_pow;
                d[(row + 1, k)] = dv * r_pow;
                r_pow *= r2;
            }
            rhs[row] = uv_obs.x - uv.x;
            rhs[row + 1] = uv_obs.y - uv.y;
        }
    }

    let k = solve_least_squares(&d, &rhs)?;
    log::trace!("radial distortion fit over {rows} equations: {k:?}");
    Ok(RadialDistortion::new(k.iter().copied().collect()))
}
