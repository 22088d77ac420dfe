use planar_calib::core::synthetic::planar;
use planar_calib::prelude::*;

#[test]
fn prelude_covers_a_full_calibration() -> anyhow::Result<()> {
    let truth = Camera::new(
        Intrinsics::new(832.5, 832.53, 0.204494, 303.959, 206.585),
        RadialDistortion::new(vec![-0.228601, 0.190353]),
    );
    let model = planar::grid_points(10, 8, 2.0);
    let views = planar::default_views(3, &model, 40.0);
    let observed = planar::project_views(&truth, &views, &model);

    let input = CalibrationInput {
        model: model.clone(),
        views: observed.clone(),
    };
    let result = run_calibration(&input, &CalibrationConfig::default())?;
    assert!(result.report().status.is_accepted());

    let sum = projection_error(result.camera(), result.views(), &model, &observed);
    let stats = projection_error_stats(result.camera(), result.views(), &model, &observed);
    assert!((stats.sum_squared - sum).abs() <= 1e-12 * sum.max(1.0));
    assert!(stats.rms < 1e-6, "{stats:?}");
    Ok(())
}
