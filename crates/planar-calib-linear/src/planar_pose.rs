//! Extrinsics of a planar target from its homography and known intrinsics.
//!
//! For a target on `Z = 0`, `H ~ A·[r0 r1 t]`, so with `λ = 1/‖A⁻¹h0‖`:
//! `r0 = λA⁻¹h0`, `r1 = λA⁻¹h1`, `r2 = r0 × r1`, `t = λA⁻¹h2`.
//! The stacked columns are only approximately a rotation under noise;
//! [`ViewTransform::from_rotation_matrix`] projects them onto SO(3) and
//! rejects matrices that are too far from one.

use planar_calib_core::{Intrinsics, Mat3, Real, ViewTransform, ViewTransformError};
use thiserror::Error;

/// Errors raised by [`estimate_view_transform`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PoseError {
    #[error("homography column maps to a null direction; cannot recover the scale")]
    DegenerateHomography,
    #[error("view {index}: {source}")]
    View {
        index: usize,
        #[source]
        source: Box<PoseError>,
    },
    #[error(transparent)]
    Rotation(#[from] ViewTransformError),
}

/// Recover the view transform of the target plane from `H` and the intrinsics.
///
/// The sign of `λ` is chosen so the target lies in front of the camera
/// (`t.z > 0`).
pub fn estimate_view_transform(
    intrinsics: &Intrinsics,
    hmtx: &Mat3,
) -> Result<ViewTransform, PoseError> {
    let a_inv = intrinsics.inverse_a();
    let a_inv_h0 = a_inv * hmtx.column(0);
    let a_inv_h1 = a_inv * hmtx.column(1);
    let a_inv_h2 = a_inv * hmtx.column(2);

    let norm = a_inv_h0.norm();
    if norm <= Real::EPSILON {
        return Err(PoseError::DegenerateHomography);
    }
    let mut lambda = 1.0 / norm;
    if a_inv_h2.z < 0.0 {
        lambda = -lambda;
    }

    let r0 = a_inv_h0 * lambda;
    let r1 = a_inv_h1 * lambda;
    let r2 = r0.cross(&r1);
    let t = a_inv_h2 * lambda;

    let r = Mat3::from_columns(&[r0, r1, r2]);
    Ok(ViewTransform::from_rotation_matrix(&r, t)?)
}

/// One view transform per homography, in input order.
pub fn estimate_view_transforms(
    intrinsics: &Intrinsics,
    hmtxs: &[Mat3],
) -> Result<Vec<ViewTransform>, PoseError> {
    hmtxs
        .iter()
        .enumerate()
        .map(|(index, h)| {
            estimate_view_transform(intrinsics, h).map_err(|e| PoseError::View {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_calib_core::{Camera, RadialDistortion, Vec3};

    fn intrinsics() -> Intrinsics {
        Intrinsics::new(800.0, 780.0, 0.5, 640.0, 360.0)
    }

    #[test]
    fn recovers_view_from_exact_homography() {
        let intr = intrinsics();
        let camera = Camera::new(intr, RadialDistortion::zeros(0));
        let gt = ViewTransform::new(Vec3::new(0.1, -0.05, 0.2), Vec3::new(0.1, -0.05, 1.0));

        let est = estimate_view_transform(&intr, &camera.homography(&gt)).unwrap();

        assert!((est.rotation_matrix() - gt.rotation_matrix()).norm() < 1e-9);
        assert!((est.translation() - gt.translation()).norm() < 1e-9);
    }

    #[test]
    fn negated_homography_gives_the_same_view() {
        let intr = intrinsics();
        let camera = Camera::new(intr, RadialDistortion::zeros(0));
        let gt = ViewTransform::new(Vec3::new(-0.3, 0.2, 0.0), Vec3::new(0.0, 0.2, 2.0));

        let est = estimate_view_transform(&intr, &(-camera.homography(&gt))).unwrap();
        assert!((est.translation() - gt.translation()).norm() < 1e-9);
        assert!(est.translation().z > 0.0);
    }

    #[test]
    fn preserves_order_and_reports_failing_view() {
        let intr = intrinsics();
        let camera = Camera::new(intr, RadialDistortion::zeros(0));
        let views = [
            ViewTransform::new(Vec3::new(0.1, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
            ViewTransform::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.1, 0.0, 1.5)),
        ];
        let hs: Vec<Mat3> = views.iter().map(|v| camera.homography(v)).collect();
        let est = estimate_view_transforms(&intr, &hs).unwrap();
        for (e, g) in est.iter().zip(&views) {
            assert!((e.translation() - g.translation()).norm() < 1e-9);
        }

        let mut bad = hs.clone();
        bad.push(Mat3::zeros());
        let err = estimate_view_transforms(&intr, &bad).unwrap_err();
        assert!(matches!(err, PoseError::View { index: 2, .. }), "{err:?}");
    }

    #[test]
    fn rejects_homography_far_from_a_rotation() {
        let intr = intrinsics();
        // Columns of A⁻¹H are orthogonal but of very different lengths.
        let h = intr.a_matrix() * Mat3::new(1.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 1.0);
        let err = estimate_view_transform(&intr, &h).unwrap_err();
        assert!(matches!(
            err,
            PoseError::Rotation(ViewTransformError::NotOrthogonal { .. })
        ));
    }
}
