use crate::{
    normalize_homography, planar_to_3d, DistortionError, Intrinsics, Mat3, Pt2, Pt3,
    RadialDistortion, Real, Vec2, ViewTransform,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of intrinsic entries at the head of a camera parameter vector.
pub const INTRINSICS_DIM: usize = 5;

/// Errors raised when constructing or inverting a [`Camera`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    #[error("camera parameter vector needs at least {INTRINSICS_DIM} entries, got {0}")]
    TooFewParameters(usize),
    #[error(transparent)]
    Distortion(#[from] DistortionError),
}

/// A calibrated pinhole camera with polynomial radial distortion.
///
/// Projection of a world point `X` seen through a view `(R, t)`:
///
/// 1. `Xc = R·X + t` (world → camera coordinates),
/// 2. `xy = (Xc.x / Xc.z, Xc.y / Xc.z)` (ideal projection plane),
/// 3. `xy' = warp(xy)` (radial distortion around the plane origin),
/// 4. `uv = A · (xy', 1)` (sensor plane, pixels).
///
/// The canonical flattened form is `(alpha, beta, gamma, uc, vc, k0, k1, ...)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Intrinsic matrix entries.
    pub intrinsics: Intrinsics,
    /// Radial distortion coefficients.
    pub distortion: RadialDistortion,
}

impl Camera {
    pub fn new(intrinsics: Intrinsics, distortion: RadialDistortion) -> Self {
        Self {
            intrinsics,
            distortion,
        }
    }

    /// Build a camera from `(alpha, beta, gamma, uc, vc, k0, k1, ...)`.
    pub fn from_parameters(params: &[Real]) -> Result<Self, CameraError> {
        if params.len() < INTRINSICS_DIM {
            return Err(CameraError::TooFewParameters(params.len()));
        }
        let intrinsics = Intrinsics::new(params[0], params[1], params[2], params[3], params[4]);
        let distortion = RadialDistortion::new(params[INTRINSICS_DIM..].to_vec());
        Ok(Self::new(intrinsics, distortion))
    }

    /// Flattened parameter vector `(alpha, beta, gamma, uc, vc, k0, k1, ...)`.
    pub fn parameters(&self) -> Vec<Real> {
        let k = &self.intrinsics;
        let mut p = Vec::with_capacity(INTRINSICS_DIM + self.distortion.len());
        p.extend_from_slice(&[k.alpha, k.beta, k.gamma, k.uc, k.vc]);
        p.extend_from_slice(&self.distortion.coefficients);
        p
    }

    /// Same intrinsics, distortion coefficients set to zero (count preserved).
    pub fn without_distortion(&self) -> Self {
        Self::new(self.intrinsics, RadialDistortion::zeros(self.distortion.len()))
    }

    /// The 3×3 intrinsic matrix `A`.
    pub fn a_matrix(&self) -> Mat3 {
        self.intrinsics.a_matrix()
    }

    /// Closed-form inverse of the intrinsic matrix.
    pub fn inverse_a(&self) -> Mat3 {
        self.intrinsics.inverse_a()
    }

    /// Project a world point seen through `view` to sensor coordinates.
    ///
    /// The point must lie in front of the camera (`z > 0` after the view
    /// transform); no visibility test is made.
    pub fn project(&self, view: &ViewTransform, x: &Pt3) -> Pt2 {
        let xy = self.project_normalized(view, x);
        self.map_to_sensor_plane(&self.warp(&xy))
    }

    /// Project a model-plane point (`Z = 0`) seen through `view`.
    pub fn project_planar(&self, view: &ViewTransform, p: &Pt2) -> Pt2 {
        self.project(view, &planar_to_3d(p))
    }

    /// Project every model-plane point of a view, preserving order.
    pub fn project_all(&self, view: &ViewTransform, model: &[Pt2]) -> Vec<Pt2> {
        model.iter().map(|p| self.project_planar(view, p)).collect()
    }

    /// Ideal (undistorted) projection-plane coordinates of a world point.
    pub fn project_normalized(&self, view: &ViewTransform, x: &Pt3) -> Vec2 {
        let xc = view.apply_to(x);
        Vec2::new(xc.x / xc.z, xc.y / xc.z)
    }

    /// Apply radial distortion on the projection plane.
    pub fn warp(&self, xy: &Vec2) -> Vec2 {
        self.distortion.warp(xy)
    }

    /// Remove radial distortion on the projection plane.
    pub fn unwarp(&self, xy: &Vec2) -> Result<Vec2, CameraError> {
        Ok(self.distortion.unwarp(xy)?)
    }

    /// Map projection-plane coordinates to sensor coordinates.
    pub fn map_to_sensor_plane(&self, xy: &Vec2) -> Pt2 {
        self.intrinsics.map_to_sensor_plane(xy)
    }

    /// Map sensor coordinates back to the projection plane.
    pub fn map_from_sensor_plane(&self, uv: &Pt2) -> Vec2 {
        self.intrinsics.map_from_sensor_plane(uv)
    }

    /// Remove lens distortion from an observed pixel.
    ///
    /// Returns the pixel a distortion-free camera with the same intrinsics
    /// would have recorded.
    pub fn undistort_pixel(&self, uv: &Pt2) -> Result<Pt2, CameraError> {
        let xy = self.map_from_sensor_plane(uv);
        let ideal = self.unwarp(&xy)?;
        Ok(self.map_to_sensor_plane(&ideal))
    }

    /// Apply lens distortion to an ideal (distortion-free) pixel.
    pub fn distort_pixel(&self, uv: &Pt2) -> Pt2 {
        let xy = self.map_from_sensor_plane(uv);
        self.map_to_sensor_plane(&self.warp(&xy))
    }

    /// Homography `A·[r0 r1 t]` induced by this camera (ignoring distortion)
    /// for the target plane seen through `view`, normalized to `H[2][2] = 1`.
    pub fn homography(&self, view: &ViewTransform) -> Mat3 {
        let r = view.rotation_matrix();
        let mut m = Mat3::zeros();
        m.set_column(0, &r.column(0));
        m.set_column(1, &r.column(1));
        m.set_column(2, &view.translation());
        normalize_homography(&(self.a_matrix() * m))
    }
}
