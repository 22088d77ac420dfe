use crate::{Real, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of function evaluations of the radius inversion.
pub const UNWARP_MAX_EVALUATIONS: usize = 100;

/// Absolute tolerance on the undistorted radius.
const UNWARP_TOLERANCE: Real = 1e-12;

/// Failure of the distortion inversion.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DistortionError {
    /// Newton–Raphson did not reach the tolerance within the evaluation budget.
    #[error("radial distortion inversion did not converge for radius {radius} after {evaluations} evaluations")]
    UnwarpDidNotConverge { radius: Real, evaluations: usize },
    /// The warp function has a vanishing derivative (no local inverse).
    #[error("radial distortion is not invertible at radius {radius}")]
    NotInvertible { radius: Real },
}

/// Polynomial radial distortion.
///
/// A point on the ideal projection plane at radius `r` is scaled by
/// `1 + k0·r² + k1·r⁴ + …`. Coefficients are ordered by increasing power of
/// `r²`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RadialDistortion {
    /// Coefficients `k0, k1, ...`.
    pub coefficients: Vec<Real>,
}

impl RadialDistortion {
    pub fn new(coefficients: Vec<Real>) -> Self {
        Self { coefficients }
    }

    /// `n` zero coefficients.
    pub fn zeros(n: usize) -> Self {
        Self::new(vec![0.0; n])
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Radial scale factor `1 + Σ kᵢ·r^(2i+2)` for a squared radius `r2`.
    pub fn factor(&self, r2: Real) -> Real {
        let mut f = 1.0;
        let mut r_pow = r2;
        for k in &self.coefficients {
            f += k * r_pow;
            r_pow *= r2;
        }
        f
    }

    /// Distorted radius for an undistorted radius `r`.
    pub fn warp_radius(&self, r: Real) -> Real {
        r * self.factor(r * r)
    }

    /// Undistorted radius for a distorted radius `rd`.
    ///
    /// There is no closed-form inverse for polynomials of degree ≥ 4, so the
    /// root of `-rd + r + k0·r³ + k1·r⁵ + …` is found with Newton–Raphson,
    /// starting at `r = rd`.
    pub fn unwarp_radius(&self, rd: Real) -> Result<Real, DistortionError> {
        if rd == 0.0 || self.coefficients.iter().all(|k| *k == 0.0) {
            return Ok(rd);
        }

        let mut r = rd;
        for evaluation in 1..=UNWARP_MAX_EVALUATIONS {
            let f = self.warp_radius(r) - rd;
            let df = self.warp_radius_derivative(r);
            if df.abs() < Real::EPSILON {
                return Err(DistortionError::NotInvertible { radius: rd });
            }
            let step = f / df;
            r -= step;
            if !r.is_finite() {
                break;
            }
            if step.abs() <= UNWARP_TOLERANCE * r.abs().max(1.0) {
                if r.signum() != rd.signum() {
                    return Err(DistortionError::NotInvertible { radius: rd });
                }
                return Ok(r);
            }
            log::trace!("unwarp radius {rd}: evaluation {evaluation}, r = {r}");
        }

        Err(DistortionError::UnwarpDidNotConverge {
            radius: rd,
            evaluations: UNWARP_MAX_EVALUATIONS,
        })
    }

    /// `d/dr [r · factor(r²)] = 1 + 3·k0·r² + 5·k1·r⁴ + …`
    pub fn warp_radius_derivative(&self, r: Real) -> Real {
        let r2 = r * r;
        let mut d = 1.0;
        let mut r_pow = r2;
        for (i, k) in self.coefficients.iter().enumerate() {
            d += (2 * i + 3) as Real * k * r_pow;
            r_pow *= r2;
        }
        d
    }

    /// Apply the distortion to a point on the ideal projection plane.
    pub fn warp(&self, xy: &Vec2) -> Vec2 {
        xy * self.factor(xy.norm_squared())
    }

    /// Remove the distortion from a point on the projection plane.
    pub fn unwarp(&self, xy: &Vec2) -> Result<Vec2, DistortionError> {
        let rd = xy.norm();
        if rd == 0.0 {
            return Ok(*xy);
        }
        let r = self.unwarp_radius(rd)?;
        Ok(xy * (r / rd))
    }
}
