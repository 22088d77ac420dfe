use planar_calib_core::{Camera, Mat3, Real, ReprojectionStats, ViewTransform};
use planar_calib_optim::SolveReport;
use serde::{Deserialize, Serialize};

/// Outcome of [`crate::CalibrationBuilder::build`].
///
/// Immutable: every accessor returns a shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationResult {
    pub(crate) initial_camera: Camera,
    pub(crate) camera: Camera,
    pub(crate) initial_views: Vec<ViewTransform>,
    pub(crate) views: Vec<ViewTransform>,
    pub(crate) homographies: Vec<Mat3>,
    pub(crate) report: SolveReport,
    pub(crate) initial_error: ReprojectionStats,
    pub(crate) final_error: ReprojectionStats,
    pub(crate) per_view_error: Vec<ReprojectionStats>,
}

impl CalibrationResult {
    /// Refined camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Closed-form camera the refinement started from.
    pub fn initial_camera(&self) -> &Camera {
        &self.initial_camera
    }

    /// Refined view transforms, one per added view, in insertion order.
    pub fn views(&self) -> &[ViewTransform] {
        &self.views
    }

    pub fn initial_views(&self) -> &[ViewTransform] {
        &self.initial_views
    }

    /// Model → image homographies used for the initialization.
    pub fn homographies(&self) -> &[Mat3] {
        &self.homographies
    }

    /// Report of the global refinement.
    pub fn report(&self) -> &SolveReport {
        &self.report
    }

    /// Reprojection statistics of the closed-form estimate.
    pub fn initial_error(&self) -> &ReprojectionStats {
        &self.initial_error
    }

    /// Reprojection statistics of the refined estimate.
    pub fn final_error(&self) -> &ReprojectionStats {
        &self.final_error
    }

    /// Refined reprojection statistics of each view.
    pub fn per_view_error(&self) -> &[ReprojectionStats] {
        &self.per_view_error
    }

    /// Serializable summary.
    pub fn to_report(&self) -> CalibrationReport {
        CalibrationReport {
            camera: self.camera.clone(),
            initial_camera: self.initial_camera.clone(),
            views: self.views.clone(),
            initial_views: self.initial_views.clone(),
            homographies: self.homographies.iter().map(rows).collect(),
            initial_error: self.initial_error,
            final_error: self.final_error,
            per_view_error: self.per_view_error.clone(),
            optimizer: self.report.clone(),
        }
    }
}

fn rows(m: &Mat3) -> [[Real; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

/// JSON-friendly calibration summary. Homographies are written row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub camera: Camera,
    pub initial_camera: Camera,
    pub views: Vec<ViewTransform>,
    pub initial_views: Vec<ViewTransform>,
    pub homographies: Vec<[[Real; 3]; 3]>,
    pub initial_error: ReprojectionStats,
    pub final_error: ReprojectionStats,
    pub per_view_error: Vec<ReprojectionStats>,
    pub optimizer: SolveReport,
}
