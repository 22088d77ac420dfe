use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use planar_calib_pipeline::{run_calibration, CalibrationConfig, CalibrationInput};

/// Planar camera calibration from JSON observations.
#[derive(Debug, Parser)]
#[command(author, version, about = "Planar camera calibration (Zhang's method)")]
struct Args {
    /// JSON file with `{ "model": [[x, y], ...], "views": [[[u, v], ...], ...] }`.
    #[arg(long)]
    input: PathBuf,

    /// Optional JSON CalibrationConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Use the finite-difference Jacobian in the global refinement.
    #[arg(long)]
    numeric_jacobian: bool,

    /// Override the number of radial distortion coefficients.
    #[arg(long)]
    distortion_coefficients: Option<usize>,

    /// Log every intermediate estimate.
    #[arg(long)]
    debug: bool,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("cannot parse {}", path.display()))
}

fn load_config(args: &Args) -> Result<CalibrationConfig> {
    let mut config = match &args.config {
        Some(path) => load_json_file(path)?,
        None => CalibrationConfig::default(),
    };
    if args.numeric_jacobian {
        config.use_numeric_jacobian = true;
    }
    if let Some(k) = args.distortion_coefficients {
        config.lens_distortion_coefficients = k;
    }
    if args.debug {
        config.debug = true;
    }
    Ok(config)
}

fn run_calibration_from_files(args: &Args) -> Result<String> {
    let input: CalibrationInput = load_json_file(&args.input)?;
    let config = load_config(args)?;
    log::info!(
        "calibrating {} views of {} points",
        input.views.len(),
        input.model.len()
    );
    let result = run_calibration(&input, &config)?;
    log::info!(
        "rms reprojection error {:.4} px -> {:.4} px ({:?})",
        result.initial_error().rms,
        result.final_error().rms,
        result.report().status
    );
    Ok(serde_json::to_string_pretty(&result.to_report())?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let json = run_calibration_from_files(&args)?;
    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_calib_core::{synthetic::planar, Camera, Intrinsics, RadialDistortion};
    use planar_calib_pipeline::CalibrationReport;
    use tempfile::NamedTempFile;

    fn write_json<T: serde::Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn synthetic_input() -> CalibrationInput {
        let camera = Camera::new(
            Intrinsics::new(800.0, 780.0, 0.0, 320.0, 240.0),
            RadialDistortion::new(vec![-0.1]),
        );
        let model = planar::grid_points(6, 5, 1.0);
        let views = planar::default_views(4, &model, 20.0);
        let observed = planar::project_views(&camera, &views, &model);
        CalibrationInput {
            model,
            views: observed,
        }
    }

    fn args(input: &Path, config: Option<&Path>) -> Args {
        Args {
            input: input.to_path_buf(),
            config: config.map(Path::to_path_buf),
            output: None,
            numeric_jacobian: false,
            distortion_coefficients: None,
            debug: false,
        }
    }

    #[test]
    fn flags_are_parsed() {
        let args = Args::try_parse_from([
            "planar-calib",
            "--input",
            "in.json",
            "--numeric-jacobian",
            "--distortion-coefficients",
            "1",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        assert!(args.numeric_jacobian);
        assert_eq!(args.distortion_coefficients, Some(1));
        assert!(args.output.is_none());
    }

    #[test]
    fn helper_smoke_test() {
        let input_file = NamedTempFile::new().unwrap();
        let config_file = NamedTempFile::new().unwrap();
        write_json(&synthetic_input(), input_file.path());
        fs::write(config_file.path(), r#"{ "lens_distortion_coefficients": 1 }"#).unwrap();

        let json = run_calibration_from_files(&args(input_file.path(), Some(config_file.path())))
            .expect("cli helper should succeed");
        let report: CalibrationReport = serde_json::from_str(&json).unwrap();
        assert!(
            report.final_error.rms < 1e-6,
            "final rms too high: {:?}",
            report.final_error
        );
        assert_eq!(report.camera.distortion.len(), 1);
        assert!((report.camera.intrinsics.alpha - 800.0).abs() < 1e-3);
    }

    #[test]
    fn flags_override_config_file() {
        let config_file = NamedTempFile::new().unwrap();
        fs::write(config_file.path(), r#"{ "lens_distortion_coefficients": 1 }"#).unwrap();
        let mut args = args(Path::new("unused.json"), Some(config_file.path()));
        args.numeric_jacobian = true;
        args.distortion_coefficients = Some(3);

        let config = load_config(&args).unwrap();
        assert!(config.use_numeric_jacobian);
        assert_eq!(config.lens_distortion_coefficients, 3);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = run_calibration_from_files(&args(&missing, None)).unwrap_err();
        assert!(err.to_string().contains("cannot read"), "{err}");
    }
}
