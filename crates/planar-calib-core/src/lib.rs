//! Core math and geometry primitives for `planar-calib`.
//!
//! This crate provides the building blocks shared by the linear estimators,
//! the non-linear refinement and the calibration pipeline:
//!
//! - linear algebra type aliases (`Real`, `Vec2`, `Pt2`, `Mat3`, ...) and the
//!   SVD-based homogeneous-system solver,
//! - the calibrated camera model ([`Camera`]: intrinsics + radial distortion),
//! - per-view extrinsics ([`ViewTransform`]: Rodrigues rotation + translation),
//! - reprojection error metrics,
//! - deterministic synthetic data helpers for tests and examples.
//!
//! Camera pipeline (conceptually):
//! `pixel = A · warp(project(R · X + t))`
//!
//! # Example
//!
//! ```
//! use planar_calib_core::{Camera, Intrinsics, Pt3, RadialDistortion, ViewTransform};
//!
//! let camera = Camera::new(
//!     Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
//!     RadialDistortion::new(vec![-0.228601, 0.190353]),
//! );
//! let uv = camera.project(&ViewTransform::identity(), &Pt3::new(40.0, 70.0, 800.0));
//! assert!((uv.x - 345.5060).abs() < 1e-4);
//! ```

/// Linear algebra type aliases and solvers.
mod math;
/// Camera model, distortion and view transforms.
mod models;
/// Reprojection error metrics.
mod reprojection;
/// Deterministic synthetic data generation helpers.
///
/// Used by the workspace tests; also handy for benchmarking and for
/// checking a calibration setup before real data is available.
pub mod synthetic;

pub use math::*;
pub use models::*;
pub use reprojection::*;
