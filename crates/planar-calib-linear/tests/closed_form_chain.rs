//! Closed-form chain on synthetic data: homographies → intrinsics → views → distortion.

use planar_calib_core::synthetic::{noise::UniformPixelNoise, planar};
use planar_calib_core::{projection_error, Camera, Intrinsics, Mat3, RadialDistortion};
use planar_calib_linear::{
    estimate_intrinsics_from_homographies, estimate_radial_distortion, estimate_view_transforms,
    HomographySolver,
};

#[test]
fn closed_form_chain_without_distortion() {
    let truth = Camera::new(
        Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
        RadialDistortion::zeros(2),
    );
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(5, &model, 40.0);
    let observed = planar::project_views(&truth, &views, &model);

    let hs: Vec<Mat3> = observed
        .iter()
        .map(|obs| HomographySolver::dlt(&model, obs, true).unwrap())
        .collect();
    let intr = estimate_intrinsics_from_homographies(&hs).unwrap();
    assert!((intr.alpha - 832.5).abs() < 1e-2, "{intr:?}");
    assert!((intr.uc - 303.959).abs() < 1e-2, "{intr:?}");

    let est_views = estimate_view_transforms(&intr, &hs).unwrap();
    for (est, gt) in est_views.iter().zip(&views) {
        assert!((est.translation() - gt.translation()).norm() < 1e-3);
        assert!((est.rotation_vector() - gt.rotation_vector()).norm() < 1e-5);
    }

    let k = estimate_radial_distortion(&intr, &est_views, &model, &observed, 2).unwrap();
    assert!(k.coefficients.iter().all(|c| c.abs() < 1e-4), "{k:?}");
}

#[test]
fn closed_form_chain_with_distortion_and_noise() {
    let truth = Camera::new(
        Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
        RadialDistortion::new(vec![-0.228601, 0.190353]),
    );
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(5, &model, 40.0);
    let mut observed = planar::project_views(&truth, &views, &model);
    UniformPixelNoise {
        seed: 99,
        max_abs_px: 0.2,
    }
    .apply_all(&mut observed);

    let hs: Vec<Mat3> = observed
        .iter()
        .map(|obs| HomographySolver::dlt(&model, obs, true).unwrap())
        .collect();
    let intr = estimate_intrinsics_from_homographies(&hs).unwrap();
    // Distortion biases the closed form; it only has to be a usable start.
    assert!((intr.alpha - 832.5).abs() < 0.1 * 832.5, "{intr:?}");
    assert!((intr.beta - 832.53).abs() < 0.1 * 832.53, "{intr:?}");

    let est_views = estimate_view_transforms(&intr, &hs).unwrap();
    assert_eq!(est_views.len(), 5);
    let k = estimate_radial_distortion(&intr, &est_views, &model, &observed, 2).unwrap();
    assert_eq!(k.len(), 2);

    // With the biased intrinsics the coefficients need not look like the
    // truth, but the fit is exact least squares and never loses to k = 0.
    let fitted = projection_error(&Camera::new(intr, k), &est_views, &model, &observed);
    let pinhole = projection_error(
        &Camera::new(intr, RadialDistortion::zeros(2)),
        &est_views,
        &model,
        &observed,
    );
    assert!(fitted <= pinhole * (1.0 + 1e-12), "{fitted} > {pinhole}");
}

#[test]
fn distortion_fit_recovers_barrel_coefficient_from_true_geometry() {
    let truth = Camera::new(
        Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
        RadialDistortion::new(vec![-0.228601, 0.190353]),
    );
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(5, &model, 40.0);
    let mut observed = planar::project_views(&truth, &views, &model);
    UniformPixelNoise {
        seed: 99,
        max_abs_px: 0.2,
    }
    .apply_all(&mut observed);

    let k = estimate_radial_distortion(&truth.intrinsics, &views, &model, &observed, 2).unwrap();
    assert!(k.coefficients[0] < 0.0, "barrel distortion expected: {k:?}");
    assert!((k.coefficients[0] + 0.228601).abs() < 0.05, "{k:?}");
}
