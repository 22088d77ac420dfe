use crate::{Mat3, Pt2, Real, Vec2};
use serde::{Deserialize, Serialize};

/// Pinhole intrinsics with skew.
///
/// Logically the 2×3 matrix
///
/// ```text
/// A = | alpha  gamma  uc |
///     |   0    beta   vc |
/// ```
///
/// mapping projection-plane coordinates `(x, y, 1)` to sensor (pixel)
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Focal length in pixels along X.
    pub alpha: Real,
    /// Focal length in pixels along Y.
    pub beta: Real,
    /// Skew term.
    pub gamma: Real,
    /// Principal point X coordinate in pixels.
    pub uc: Real,
    /// Principal point Y coordinate in pixels.
    pub vc: Real,
}

impl Intrinsics {
    pub fn new(alpha: Real, beta: Real, gamma: Real, uc: Real, vc: Real) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            uc,
            vc,
        }
    }

    /// Read the first five entries of a 3×3 upper-triangular intrinsic matrix.
    ///
    /// The matrix is expected to be normalized so that `A[2][2] = 1`.
    pub fn from_matrix(a: &Mat3) -> Self {
        Self::new(a[(0, 0)], a[(1, 1)], a[(0, 1)], a[(0, 2)], a[(1, 2)])
    }

    /// The full 3×3 intrinsic matrix.
    pub fn a_matrix(&self) -> Mat3 {
        Mat3::new(
            self.alpha, self.gamma, self.uc, 0.0, self.beta, self.vc, 0.0, 0.0, 1.0,
        )
    }

    /// Closed-form inverse of [`Self::a_matrix`].
    ///
    /// Uses the upper-triangular structure directly instead of a generic
    /// matrix inverse.
    pub fn inverse_a(&self) -> Mat3 {
        let Self {
            alpha,
            beta,
            gamma,
            uc,
            vc,
        } = *self;
        Mat3::new(
            1.0 / alpha,
            -gamma / (alpha * beta),
            (gamma * vc - beta * uc) / (alpha * beta),
            0.0,
            1.0 / beta,
            -vc / beta,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Map projection-plane coordinates to sensor (pixel) coordinates.
    pub fn map_to_sensor_plane(&self, xy: &Vec2) -> Pt2 {
        Pt2::new(
            self.alpha * xy.x + self.gamma * xy.y + self.uc,
            self.beta * xy.y + self.vc,
        )
    }

    /// Map sensor (pixel) coordinates back to projection-plane coordinates.
    pub fn map_from_sensor_plane(&self, uv: &Pt2) -> Vec2 {
        let y = (uv.y - self.vc) / self.beta;
        let x = (uv.x - self.uc - self.gamma * y) / self.alpha;
        Vec2::new(x, y)
    }
}
