use crate::{steps, CalibrationConfig, CalibrationResult};
use anyhow::{ensure, Result};
use planar_calib_core::{projection_error_stats, projection_error_stats_per_view, Camera, Pt2};

/// Minimum number of views for a calibration.
pub const MIN_VIEWS: usize = 2;

/// Collects the model and the observed views, then runs the calibration.
///
/// ```no_run
/// use planar_calib_pipeline::{CalibrationBuilder, CalibrationConfig};
/// use planar_calib_core::Pt2;
///
/// # fn views() -> Vec<Vec<Pt2>> { Vec::new() }
/// # fn model() -> Vec<Pt2> { Vec::new() }
/// let mut builder = CalibrationBuilder::new(model()).with_config(CalibrationConfig::default());
/// for observed in views() {
///     builder.add_view(observed)?;
/// }
/// let result = builder.build()?;
/// println!("rms {:.3} px", result.final_error().rms);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationBuilder {
    model: Vec<Pt2>,
    views: Vec<Vec<Pt2>>,
    config: CalibrationConfig,
}

impl CalibrationBuilder {
    /// Start a calibration for the given model points (target plane, `Z = 0`).
    pub fn new(model: Vec<Pt2>) -> Self {
        Self {
            model,
            views: Vec::new(),
            config: CalibrationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Append the observations of one view.
    ///
    /// `observed[i]` must be the image of `model[i]`, so the lengths must match.
    pub fn add_view(&mut self, observed: Vec<Pt2>) -> Result<&mut Self> {
        ensure!(
            observed.len() == self.model.len(),
            "view {} has {} points, the model has {}",
            self.views.len(),
            observed.len(),
            self.model.len()
        );
        self.views.push(observed);
        Ok(self)
    }

    pub fn model(&self) -> &[Pt2] {
        &self.model
    }

    pub fn views(&self) -> &[Vec<Pt2>] {
        &self.views
    }

    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Run the whole pipeline on the views added so far.
    ///
    /// Can be called repeatedly; each call starts from scratch.
    pub fn build(&self) -> Result<CalibrationResult> {
        ensure!(
            self.views.len() >= MIN_VIEWS,
            "calibration needs at least {MIN_VIEWS} views, got {}",
            self.views.len()
        );
        let (model, observed, config) = (&self.model[..], &self.views[..], &self.config);
        log::debug!(
            "calibrating {} views of {} points",
            observed.len(),
            model.len()
        );

        let homographies = steps::estimate_homographies(model, observed, config)?;
        let intrinsics = steps::estimate_intrinsics(&homographies, config)?;
        let initial_views = steps::estimate_views(&intrinsics, &homographies, config)?;
        let distortion =
            steps::estimate_distortion(&intrinsics, &initial_views, model, observed, config)?;
        let initial_camera = Camera::new(intrinsics, distortion);
        let initial_error =
            projection_error_stats(&initial_camera, &initial_views, model, observed);

        let refined = steps::refine(model, observed, &initial_camera, &initial_views, config)?;
        let final_error = projection_error_stats(&refined.camera, &refined.views, model, observed);
        let per_view_error =
            projection_error_stats_per_view(&refined.camera, &refined.views, model, observed);

        log::debug!(
            "rms reprojection error {:.4} px -> {:.4} px",
            initial_error.rms,
            final_error.rms
        );

        Ok(CalibrationResult {
            initial_camera,
            camera: refined.camera,
            initial_views,
            views: refined.views,
            homographies,
            report: refined.report,
            initial_error,
            final_error,
            per_view_error,
        })
    }
}
