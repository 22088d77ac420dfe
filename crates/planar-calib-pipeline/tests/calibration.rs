use planar_calib_core::synthetic::{noise::UniformPixelNoise, planar};
use planar_calib_core::{Camera, Intrinsics, Pt2, RadialDistortion};
use planar_calib_optim::OptimError;
use planar_calib_pipeline::{steps, CalibrationBuilder, CalibrationConfig, CalibrationReport};

fn reference_camera() -> Camera {
    Camera::new(
        Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
        RadialDistortion::new(vec![-0.228601, 0.190353]),
    )
}

fn dataset(n_views: usize, noise_px: f64) -> (Vec<Pt2>, Vec<Vec<Pt2>>) {
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(n_views, &model, 40.0);
    let mut observed = planar::project_views(&reference_camera(), &views, &model);
    UniformPixelNoise {
        seed: 7,
        max_abs_px: noise_px,
    }
    .apply_all(&mut observed);
    (model, observed)
}

fn builder(model: &[Pt2], observed: &[Vec<Pt2>], config: CalibrationConfig) -> CalibrationBuilder {
    let mut builder = CalibrationBuilder::new(model.to_vec()).with_config(config);
    for view in observed {
        builder.add_view(view.clone()).unwrap();
    }
    builder
}

fn assert_close(a: &[f64], b: &[f64], rel: f64) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        assert!(
            (x - y).abs() <= rel * x.abs().max(1.0),
            "parameter {i}: {x} vs {y}"
        );
    }
}

#[test]
fn noise_free_five_views_recover_reference_camera() {
    let (model, observed) = dataset(5, 0.0);
    let result = builder(&model, &observed, CalibrationConfig::default())
        .build()
        .unwrap();

    assert!(result.report().status.is_accepted());
    assert!(result.final_error().rms < 1e-6, "{:?}", result.final_error());
    assert!(result.final_error().rms <= result.initial_error().rms);
    assert_close(
        &result.camera().parameters(),
        &reference_camera().parameters(),
        1e-4,
    );
    assert_eq!(result.views().len(), 5);
    assert_eq!(result.initial_views().len(), 5);
    assert_eq!(result.homographies().len(), 5);
    assert_eq!(result.per_view_error().len(), 5);
    assert!(result.per_view_error().iter().all(|s| s.count == model.len()));
}

#[test]
fn analytic_and_numeric_jacobians_agree_on_noisy_data() {
    let (model, observed) = dataset(5, 0.1);
    let analytic = builder(&model, &observed, CalibrationConfig::default())
        .build()
        .unwrap();
    let numeric = builder(
        &model,
        &observed,
        CalibrationConfig {
            use_numeric_jacobian: true,
            ..CalibrationConfig::default()
        },
    )
    .build()
    .unwrap();

    assert!(analytic.final_error().rms < 0.1, "{:?}", analytic.final_error());
    assert!(analytic.final_error().rms < analytic.initial_error().rms);
    assert_close(
        &analytic.camera().parameters(),
        &numeric.camera().parameters(),
        1e-3,
    );
    // The closed-form stages do not depend on the Jacobian choice.
    assert_eq!(analytic.initial_camera(), numeric.initial_camera());
}

#[test]
fn two_views_are_enough() {
    let (model, observed) = dataset(2, 0.0);
    let result = builder(&model, &observed, CalibrationConfig::default())
        .build()
        .unwrap();
    assert!(result.final_error().rms < 1e-3, "{:?}", result.final_error());
    // Two views only weakly constrain the skew, so compare loosely.
    let intr = result.camera().intrinsics;
    assert!((intr.alpha - 832.5).abs() < 0.05 * 832.5, "{intr:?}");
    assert!((intr.beta - 832.53).abs() < 0.05 * 832.53, "{intr:?}");
}

#[test]
fn fewer_than_two_views_are_rejected() {
    let (model, observed) = dataset(1, 0.0);
    let empty = CalibrationBuilder::new(model.clone());
    assert!(empty.build().is_err());

    let single = builder(&model, &observed, CalibrationConfig::default());
    assert_eq!(single.num_views(), 1);
    let err = single.build().unwrap_err();
    assert!(err.to_string().contains("at least 2 views"), "{err}");
}

#[test]
fn view_with_wrong_point_count_is_rejected() {
    let (model, observed) = dataset(2, 0.0);
    let mut builder = CalibrationBuilder::new(model);
    builder.add_view(observed[0].clone()).unwrap();

    let mut short = observed[1].clone();
    short.pop();
    assert!(builder.add_view(short).is_err());
    assert_eq!(builder.num_views(), 1);
}

#[test]
fn failed_refinement_surfaces_not_converged() {
    let (model, mut observed) = dataset(3, 0.0);
    let views = planar::default_views(3, &model, 40.0);
    observed[2][5].y = f64::NAN;

    let err = steps::refine(
        &model,
        &observed,
        &reference_camera(),
        &views,
        &CalibrationConfig::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("global refinement failed"), "{err}");
    let cause = err.downcast_ref::<OptimError>();
    assert!(
        matches!(cause, Some(OptimError::NotConverged { status, .. }) if !status.is_accepted()),
        "{err:?}"
    );
}

#[test]
fn debug_logging_does_not_change_the_result() {
    let (model, observed) = dataset(3, 0.05);
    let quiet = builder(&model, &observed, CalibrationConfig::default())
        .build()
        .unwrap();
    let verbose = builder(
        &model,
        &observed,
        CalibrationConfig {
            debug: true,
            ..CalibrationConfig::default()
        },
    )
    .build()
    .unwrap();
    assert_eq!(quiet.camera(), verbose.camera());
    assert_eq!(quiet.views(), verbose.views());
}

#[test]
fn build_is_repeatable() {
    let (model, observed) = dataset(3, 0.05);
    let builder = builder(&model, &observed, CalibrationConfig::default());
    let first = builder.build().unwrap();
    let second = builder.build().unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_distortion_coefficients_fit_a_pinhole_camera() {
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(4, &model, 40.0);
    let truth = Camera::new(reference_camera().intrinsics, RadialDistortion::default());
    let observed = planar::project_views(&truth, &views, &model);
    let config = CalibrationConfig {
        lens_distortion_coefficients: 0,
        ..CalibrationConfig::default()
    };
    let result = builder(&model, &observed, config).build().unwrap();
    assert!(result.camera().distortion.is_empty());
    assert_close(&result.camera().parameters(), &truth.parameters(), 1e-4);
}

#[test]
fn report_survives_json() {
    let (model, observed) = dataset(3, 0.05);
    let result = builder(&model, &observed, CalibrationConfig::default())
        .build()
        .unwrap();
    let report = result.to_report();
    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"homographies\""));
    assert!(json.contains("\"per_view_error\""));

    let back: CalibrationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.views.len(), 3);
    assert_eq!(back.homographies.len(), 3);
    assert_eq!(back.optimizer.status, report.optimizer.status);
    assert_close(&back.camera.parameters(), &report.camera.parameters(), 1e-12);
    let h = result.homographies()[1];
    assert!((back.homographies[1][0][2] - h[(0, 2)]).abs() <= 1e-9 * h[(0, 2)].abs().max(1.0));
}
