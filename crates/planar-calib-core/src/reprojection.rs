//! Reprojection error metrics.
//!
//! All functions are pure diagnostics: they never modify the camera or views.

use crate::{apply_homography, Camera, Mat3, Pt2, Real, ViewTransform};
use serde::{Deserialize, Serialize};

/// Summary of per-point reprojection distances (pixels).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReprojectionStats {
    /// Sum of squared distances.
    pub sum_squared: Real,
    /// Mean distance.
    pub mean: Real,
    /// Root mean squared distance.
    pub rms: Real,
    /// Largest distance.
    pub max: Real,
    /// Number of points.
    pub count: usize,
}

impl ReprojectionStats {
    /// Aggregate a sequence of per-point distances.
    pub fn from_distances(distances: impl IntoIterator<Item = Real>) -> Self {
        let mut stats = Self::default();
        let mut sum = 0.0;
        for d in distances {
            sum += d;
            stats.sum_squared += d * d;
            stats.max = stats.max.max(d);
            stats.count += 1;
        }
        if stats.count > 0 {
            let n = stats.count as Real;
            stats.mean = sum / n;
            stats.rms = (stats.sum_squared / n).sqrt();
        }
        stats
    }
}

/// Sum of squared pixel residuals of one view.
pub fn view_projection_error(
    camera: &Camera,
    view: &ViewTransform,
    model: &[Pt2],
    observed: &[Pt2],
) -> Real {
    debug_assert_eq!(model.len(), observed.len());
    model
        .iter()
        .zip(observed)
        .map(|(p, uv)| (camera.project_planar(view, p) - uv).norm_squared())
        .sum()
}

/// Sum of squared pixel residuals over all views.
///
/// `views` and `observed` are index-corresponding.
pub fn projection_error(
    camera: &Camera,
    views: &[ViewTransform],
    model: &[Pt2],
    observed: &[Vec<Pt2>],
) -> Real {
    debug_assert_eq!(views.len(), observed.len());
    views
        .iter()
        .zip(observed)
        .map(|(view, obs)| view_projection_error(camera, view, model, obs))
        .sum()
}

/// Per-point distance statistics over all views.
pub fn projection_error_stats(
    camera: &Camera,
    views: &[ViewTransform],
    model: &[Pt2],
    observed: &[Vec<Pt2>],
) -> ReprojectionStats {
    ReprojectionStats::from_distances(views.iter().zip(observed).flat_map(|(view, obs)| {
        model
            .iter()
            .zip(obs)
            .map(move |(p, uv)| (camera.project_planar(view, p) - uv).norm())
    }))
}

/// Per-view distance statistics, in view order.
pub fn projection_error_stats_per_view(
    camera: &Camera,
    views: &[ViewTransform],
    model: &[Pt2],
    observed: &[Vec<Pt2>],
) -> Vec<ReprojectionStats> {
    views
        .iter()
        .zip(observed)
        .map(|(view, obs)| {
            ReprojectionStats::from_distances(
                model
                    .iter()
                    .zip(obs)
                    .map(|(p, uv)| (camera.project_planar(view, p) - uv).norm()),
            )
        })
        .collect()
}

/// Distance statistics of a homography mapping `model` onto `observed`.
pub fn homography_error_stats(h: &Mat3, model: &[Pt2], observed: &[Pt2]) -> ReprojectionStats {
    ReprojectionStats::from_distances(
        model
            .iter()
            .zip(observed)
            .map(|(p, uv)| (apply_homography(h, p) - uv).norm()),
    )
}
