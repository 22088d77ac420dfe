//! Stages of the calibration pipeline.
//!
//! Each stage is a pure function of its inputs and the configuration; the
//! builder runs them in a fixed order:
//!
//! 1. [`estimate_homographies`]: one model → image homography per view,
//! 2. [`estimate_intrinsics`]: Zhang's closed form,
//! 3. [`estimate_views`]: per-view extrinsics,
//! 4. [`estimate_distortion`]: linear radial fit,
//! 5. [`refine`]: joint LM refinement of everything.

use crate::CalibrationConfig;
use anyhow::{Context, Result};
use planar_calib_core::{Camera, Intrinsics, Mat3, Pt2, RadialDistortion, ViewTransform};
use planar_calib_linear::{
    estimate_intrinsics_from_homographies, estimate_radial_distortion, estimate_view_transforms,
    HomographySolver,
};
use planar_calib_optim::{refine_calibration, refine_homography, CalibrationRefinement};

/// Log an intermediate estimate: `info` when the configuration asks for it,
/// `debug` otherwise.
fn log_stage(config: &CalibrationConfig, message: std::fmt::Arguments<'_>) {
    if config.debug {
        log::info!("{message}");
    } else {
        log::debug!("{message}");
    }
}

/// Homography of every view, in view order.
pub fn estimate_homographies(
    model: &[Pt2],
    views: &[Vec<Pt2>],
    config: &CalibrationConfig,
) -> Result<Vec<Mat3>> {
    views
        .iter()
        .enumerate()
        .map(|(idx, observed)| {
            let h0 = HomographySolver::dlt(model, observed, config.normalize_point_coordinates)
                .with_context(|| format!("failed to compute homography for view {idx}"))?;
            let h = if config.refine_homographies {
                refine_homography(model, observed, &h0, &config.homography_solve)
                    .with_context(|| format!("failed to refine homography for view {idx}"))?
                    .homography
            } else {
                h0
            };
            log_stage(config, format_args!("view {idx}: homography {h}"));
            Ok(h)
        })
        .collect()
}

/// Closed-form intrinsics from the homographies.
pub fn estimate_intrinsics(
    homographies: &[Mat3],
    config: &CalibrationConfig,
) -> Result<Intrinsics> {
    let intrinsics = estimate_intrinsics_from_homographies(homographies)
        .context("failed to estimate intrinsics from homographies")?;
    log_stage(config, format_args!("initial intrinsics: {intrinsics:?}"));
    Ok(intrinsics)
}

/// Extrinsics of every view from the intrinsics and its homography.
pub fn estimate_views(
    intrinsics: &Intrinsics,
    homographies: &[Mat3],
    config: &CalibrationConfig,
) -> Result<Vec<ViewTransform>> {
    let views = estimate_view_transforms(intrinsics, homographies)
        .context("failed to recover view transforms")?;
    for (idx, view) in views.iter().enumerate() {
        log_stage(
            config,
            format_args!(
                "view {idx}: rotation {:?}, translation {:?}",
                view.rotation_vector().as_slice(),
                view.translation().as_slice()
            ),
        );
    }
    Ok(views)
}

/// Linear fit of `config.lens_distortion_coefficients` radial coefficients.
pub fn estimate_distortion(
    intrinsics: &Intrinsics,
    views: &[ViewTransform],
    model: &[Pt2],
    observed: &[Vec<Pt2>],
    config: &CalibrationConfig,
) -> Result<RadialDistortion> {
    let distortion = estimate_radial_distortion(
        intrinsics,
        views,
        model,
        observed,
        config.lens_distortion_coefficients,
    )
    .context("failed to estimate radial distortion")?;
    log_stage(config, format_args!("initial distortion: {:?}", distortion.coefficients));
    Ok(distortion)
}

/// Joint refinement of camera and views.
pub fn refine(
    model: &[Pt2],
    observed: &[Vec<Pt2>],
    camera: &Camera,
    views: &[ViewTransform],
    config: &CalibrationConfig,
) -> Result<CalibrationRefinement> {
    let strategy = config.jacobian_strategy();
    let refined = refine_calibration(model, observed, camera, views, strategy, &config.solve)
        .with_context(|| format!("global refinement failed ({} jacobian)", strategy.name()))?;
    log_stage(
        config,
        format_args!(
            "refined camera: {:?}, {:?} after {} evaluations",
            refined.camera.parameters(),
            refined.report.status,
            refined.report.evaluations
        ),
    );
    Ok(refined)
}
