//! Entry crate of the `planar-calib` toolbox.
//!
//! Calibrates a pinhole camera with polynomial radial distortion from several
//! views of a planar target (Zhang's method). The work is split across
//! crates, all re-exported here:
//!
//! - [`core`]: camera model, view transforms, reprojection metrics and
//!   synthetic data,
//! - [`linear`]: closed-form estimators (homography DLT, intrinsics from
//!   homographies, pose from homography, linear radial distortion),
//! - [`optim`]: Levenberg–Marquardt backend and the refinement problems,
//! - [`pipeline`]: configuration, builder and the serializable report.
//!
//! ## Builder API
//!
//! ```no_run
//! use planar_calib::prelude::*;
//!
//! # fn load() -> (Vec<Pt2>, Vec<Vec<Pt2>>) { (Vec::new(), Vec::new()) }
//! let (model, views) = load();
//! let mut builder = CalibrationBuilder::new(model).with_config(CalibrationConfig {
//!     lens_distortion_coefficients: 2,
//!     ..CalibrationConfig::default()
//! });
//! for observed in views {
//!     builder.add_view(observed)?;
//! }
//! let result = builder.build()?;
//! println!("camera: {:?}", result.camera());
//! println!("rms: {:.4} px", result.final_error().rms);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Stage by stage
//!
//! The pipeline stages are plain functions, so a custom workflow can stop
//! after the closed-form estimate or swap in its own refinement:
//!
//! ```no_run
//! use planar_calib::pipeline::steps;
//! use planar_calib::prelude::*;
//!
//! # fn load() -> (Vec<Pt2>, Vec<Vec<Pt2>>) { (Vec::new(), Vec::new()) }
//! let (model, views) = load();
//! let config = CalibrationConfig::default();
//! let hs = steps::estimate_homographies(&model, &views, &config)?;
//! let intrinsics = steps::estimate_intrinsics(&hs, &config)?;
//! let poses = steps::estimate_views(&intrinsics, &hs, &config)?;
//! println!("alpha = {}, {} poses", intrinsics.alpha, poses.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Camera model, view transforms, reprojection metrics, synthetic data.
pub mod core {
    pub use planar_calib_core::*;
}

/// Closed-form initialization.
pub mod linear {
    pub use planar_calib_linear::*;
}

/// Non-linear least squares: backend, Jacobians and refinement problems.
pub mod optim {
    pub use planar_calib_optim::*;
}

/// End-to-end calibration.
pub mod pipeline {
    pub use planar_calib_pipeline::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use planar_calib::prelude::*;`.
pub mod prelude {
    pub use crate::core::{
        projection_error, projection_error_stats, Camera, Intrinsics, Mat3, Pt2, Pt3,
        RadialDistortion, ReprojectionStats, ViewTransform,
    };
    pub use crate::optim::{SolveOptions, SolveReport, SolveStatus};
    pub use crate::pipeline::{
        run_calibration, CalibrationBuilder, CalibrationConfig, CalibrationInput,
        CalibrationReport, CalibrationResult,
    };
}
