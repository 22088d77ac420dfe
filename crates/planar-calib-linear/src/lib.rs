//! Linear (closed-form) estimators for planar camera calibration.
//!
//! Each estimator turns point correspondences or earlier estimates into an
//! initial guess for the non-linear refinement:
//!
//! - [`HomographySolver::dlt`]: model plane → image homography,
//! - [`estimate_intrinsics_from_homographies`]: intrinsics from ≥ 2 homographies,
//! - [`estimate_view_transform`]: per-view extrinsics from intrinsics + homography,
//! - [`estimate_radial_distortion`]: linear fit of the radial coefficients.
//!
//! All functions are pure and return typed errors; none of them panics on
//! degenerate input.

mod distortion_fit;
mod homography;
pub mod math;
mod planar_pose;
mod zhang_intrinsics;

pub use distortion_fit::*;
pub use homography::*;
pub use planar_pose::*;
pub use zhang_intrinsics::*;
