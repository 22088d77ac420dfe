//! Deterministic synthetic data generation helpers.
//!
//! Small building blocks for constructing synthetic calibration problems:
//! - planar model point grids,
//! - view transforms that keep the target in front of the camera,
//! - projection of the model into every view,
//! - deterministic pseudo-random pixel noise.
//!
//! Everything is seeded explicitly and point ordering is stable, so datasets
//! are identical across runs and platforms.
//!
//! # Example
//!
//! ```
//! use planar_calib_core::synthetic::{noise::UniformPixelNoise, planar};
//! use planar_calib_core::{Camera, Intrinsics, RadialDistortion};
//!
//! let camera = Camera::new(
//!     Intrinsics::new(800.0, 800.0, 0.0, 320.0, 240.0),
//!     RadialDistortion::zeros(2),
//! );
//! let model = planar::grid_points(6, 5, 2.0);
//! let views = planar::default_views(3, &model, 40.0);
//! let mut observed = planar::project_views(&camera, &views, &model);
//! UniformPixelNoise { seed: 7, max_abs_px: 0.2 }.apply_all(&mut observed);
//! assert_eq!(observed.len(), 3);
//! ```

pub mod noise;
pub mod planar;
