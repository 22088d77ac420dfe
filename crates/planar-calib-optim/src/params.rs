//! Layout of the flat parameter vector used by the calibration refinement.
//!
//! ```text
//! [ alpha beta gamma uc vc k0 … k(K−1) | rx ry rz tx ty tz | … per view … ]
//! ```

use nalgebra::DVector;
use planar_calib_core::{
    Camera, Intrinsics, RadialDistortion, Real, Vec3, ViewTransform, INTRINSICS_DIM, VIEW_DIM,
};

/// Sizes and offsets of the camera block and the per-view blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLayout {
    /// Number of radial distortion coefficients `K`.
    pub num_distortion: usize,
    /// Number of views `M`.
    pub num_views: usize,
}

impl ParamLayout {
    pub fn new(num_distortion: usize, num_views: usize) -> Self {
        Self {
            num_distortion,
            num_views,
        }
    }

    /// Width of the shared camera block (`5 + K`).
    pub fn camera_dim(&self) -> usize {
        INTRINSICS_DIM + self.num_distortion
    }

    /// Offset of view `i`'s block.
    pub fn view_offset(&self, i: usize) -> usize {
        self.camera_dim() + VIEW_DIM * i
    }

    /// Total number of parameters.
    pub fn len(&self) -> usize {
        self.view_offset(self.num_views)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten a camera and its views. The layout must match their sizes.
    pub fn pack(&self, camera: &Camera, views: &[ViewTransform]) -> DVector<Real> {
        debug_assert_eq!(camera.distortion.len(), self.num_distortion);
        debug_assert_eq!(views.len(), self.num_views);

        let mut x = DVector::zeros(self.len());
        for (i, p) in camera.parameters().into_iter().enumerate() {
            x[i] = p;
        }
        for (i, view) in views.iter().enumerate() {
            x.rows_mut(self.view_offset(i), VIEW_DIM)
                .copy_from_slice(&view.parameters());
        }
        x
    }

    /// Decode the camera block.
    pub fn camera(&self, x: &DVector<Real>) -> Camera {
        Camera::new(
            Intrinsics::new(x[0], x[1], x[2], x[3], x[4]),
            RadialDistortion::new(
                x.rows(INTRINSICS_DIM, self.num_distortion)
                    .iter()
                    .copied()
                    .collect(),
            ),
        )
    }

    /// Decode view `i`.
    pub fn view(&self, x: &DVector<Real>, i: usize) -> ViewTransform {
        let o = self.view_offset(i);
        ViewTransform::new(
            Vec3::new(x[o], x[o + 1], x[o + 2]),
            Vec3::new(x[o + 3], x[o + 4], x[o + 5]),
        )
    }

    /// Decode every view, in order.
    pub fn views(&self, x: &DVector<Real>) -> Vec<ViewTransform> {
        (0..self.num_views).map(|i| self.view(x, i)).collect()
    }
}
