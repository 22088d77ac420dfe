use planar_calib_optim::{AnalyticJacobian, JacobianStrategy, NumericJacobian, SolveOptions};
use serde::{Deserialize, Serialize};

/// Settings of a calibration run. Every field has a default, so a partial
/// JSON object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Normalize point coordinates before the homography DLT.
    pub normalize_point_coordinates: bool,
    /// Refine every DLT homography with LM before estimating intrinsics.
    pub refine_homographies: bool,
    /// Use forward differences instead of the closed-form Jacobian.
    pub use_numeric_jacobian: bool,
    /// Number of radial distortion coefficients `K` (`k0 … k(K−1)`).
    pub lens_distortion_coefficients: usize,
    /// Log every intermediate estimate at `info` level.
    pub debug: bool,
    /// Solver settings of the homography refinement.
    pub homography_solve: SolveOptions,
    /// Solver settings of the global refinement.
    pub solve: SolveOptions,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            normalize_point_coordinates: true,
            refine_homographies: true,
            use_numeric_jacobian: false,
            lens_distortion_coefficients: 2,
            debug: false,
            homography_solve: SolveOptions {
                max_iters: 100,
                ..SolveOptions::default()
            },
            solve: SolveOptions::default(),
        }
    }
}

impl CalibrationConfig {
    /// Jacobian strategy of the global refinement.
    pub fn jacobian_strategy(&self) -> &'static dyn JacobianStrategy {
        if self.use_numeric_jacobian {
            &NumericJacobian
        } else {
            &AnalyticJacobian
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg: CalibrationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, CalibrationConfig::default());
        assert_eq!(cfg.lens_distortion_coefficients, 2);
        assert!(cfg.normalize_point_coordinates);
        assert!(cfg.refine_homographies);
        assert_eq!(cfg.jacobian_strategy().name(), "analytic");
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg: CalibrationConfig = serde_json::from_str(
            r#"{ "use_numeric_jacobian": true, "solve": { "max_iters": 30 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.jacobian_strategy().name(), "numeric");
        assert_eq!(cfg.solve.max_iters, 30);
        assert_eq!(cfg.solve.ftol, SolveOptions::default().ftol);
        assert_eq!(cfg.homography_solve.max_iters, 100);
    }
}
