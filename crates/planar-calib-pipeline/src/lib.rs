//! High-level planar camera calibration.
//!
//! [`CalibrationBuilder`] collects a model (the target's points on its plane)
//! and the observed image points of every view, then runs the pipeline:
//! homographies, closed-form intrinsics, view transforms, linear radial
//! distortion and a final joint Levenberg–Marquardt refinement. The outcome is
//! an immutable [`CalibrationResult`], which can be turned into a
//! serializable [`CalibrationReport`]. [`CalibrationInput`] and
//! [`run_calibration`] cover the common "load JSON, calibrate" case.
//!
//! ```no_run
//! use planar_calib_core::synthetic::planar;
//! use planar_calib_core::{Camera, Intrinsics, RadialDistortion};
//! use planar_calib_pipeline::CalibrationBuilder;
//!
//! let truth = Camera::new(
//!     Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
//!     RadialDistortion::new(vec![-0.228601, 0.190353]),
//! );
//! let model = planar::grid_points(10, 8, 2.0);
//! let views = planar::default_views(5, &model, 40.0);
//!
//! let mut builder = CalibrationBuilder::new(model.clone());
//! for observed in planar::project_views(&truth, &views, &model) {
//!     builder.add_view(observed)?;
//! }
//! let result = builder.build()?;
//! assert!((result.camera().intrinsics.alpha - 832.5).abs() < 1e-3);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod builder;
mod config;
mod input;
mod result;
pub mod steps;

pub use builder::{CalibrationBuilder, MIN_VIEWS};
pub use config::CalibrationConfig;
pub use input::{run_calibration, CalibrationInput};
pub use planar_calib_core::{
    projection_error, projection_error_stats, Camera, Pt2, ReprojectionStats, ViewTransform,
};
pub use result::{CalibrationReport, CalibrationResult};
