//! Homography estimation (plane-induced projective transform).
//!
//! Implements the Direct Linear Transform with optional point normalization.
//! The homography `H` maps **model points** on the target plane to **image
//! points** in pixels: `x' ~ H x`.

use crate::math::PointNormalization;
use nalgebra::DMatrix;
use planar_calib_core::{normalize_homography, solve_homogeneous_system, LinalgError, Mat3, Pt2};
use thiserror::Error;

/// Errors raised by [`HomographySolver`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HomographyError {
    #[error("need at least 4 point correspondences, got {0}")]
    NotEnoughPoints(usize),
    #[error("model has {model} points but the image has {image}")]
    MismatchedLengths { model: usize, image: usize },
    #[error("degenerate point configuration for normalization")]
    DegenerateConfiguration,
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Entry point for homography estimation.
#[derive(Debug, Clone, Copy)]
pub struct HomographySolver;

/// Estimate `H` such that `x' ~ H x` using the normalized DLT.
pub fn dlt_homography(model: &[Pt2], image: &[Pt2]) -> Result<Mat3, HomographyError> {
    HomographySolver::dlt(model, image, true)
}

impl HomographySolver {
    /// Estimate a homography `H` such that `x' ~ H x`.
    ///
    /// With `normalize` set, both point sets are first mapped to zero mean and
    /// mean squared distance 2 (`Na`, `Nb`), the DLT is solved in normalized
    /// coordinates and the result is brought back as `H = Nb⁻¹·Hn·Na`.
    /// The returned matrix is scaled so that `H[2,2] == 1` when possible.
    pub fn dlt(model: &[Pt2], image: &[Pt2], normalize: bool) -> Result<Mat3, HomographyError> {
        let n = model.len();
        if image.len() != n {
            return Err(HomographyError::MismatchedLengths {
                model: n,
                image: image.len(),
            });
        }
        if n < 4 {
            return Err(HomographyError::NotEnoughPoints(n));
        }

        let (na, nb) = if normalize {
            (
                PointNormalization::from_points(model)
                    .ok_or(HomographyError::DegenerateConfiguration)?,
                PointNormalization::from_points(image)
                    .ok_or(HomographyError::DegenerateConfiguration)?,
            )
        } else {
            (PointNormalization::identity(), PointNormalization::identity())
        };

        let mut a = DMatrix::<f64>::zeros(2 * n, 9);
        for (i, (pm, pi)) in model.iter().zip(image).enumerate() {
            let pm = na.apply(pm);
            let pi = nb.apply(pi);
            let (x, y, u, v) = (pm.x, pm.y, pi.x, pi.y);

            let r0 = 2 * i;
            let r1 = 2 * i + 1;

            a[(r0, 0)] = -x;
            a[(r0, 1)] = -y;
            a[(r0, 2)] = -1.0;
            a[(r0, 6)] = u * x;
            a[(r0, 7)] = u * y;
            a[(r0, 8)] = u;

            a[(r1, 3)] = -x;
            a[(r1, 4)] = -y;
            a[(r1, 5)] = -1.0;
            a[(r1, 6)] = v * x;
            a[(r1, 7)] = v * y;
            a[(r1, 8)] = v;
        }

        let h = solve_homogeneous_system(&a)?;
        let hn = Mat3::from_row_slice(h.as_slice());
        let h_mat = nb.inverse_matrix() * hn * na.matrix();

        Ok(normalize_homography(&h_mat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_calib_core::apply_homography;
    use planar_calib_core::synthetic::{noise::GaussianPixelNoise, planar};

    fn ground_truth() -> Mat3 {
        Mat3::new(
            80.0, 1.2, 300.0, //
            -0.8, 79.0, 210.0, //
            0.002, -0.001, 1.0,
        )
    }

    fn correspondences() -> (Vec<Pt2>, Vec<Pt2>) {
        let model = planar::grid_points(8, 6, 1.0);
        let h = ground_truth();
        let image = model.iter().map(|p| apply_homography(&h, p)).collect();
        (model, image)
    }

    #[test]
    fn dlt_recovers_exact_homography() {
        let (model, image) = correspondences();
        for (normalize, tol) in [(true, 1e-9), (false, 1e-6)] {
            let h = HomographySolver::dlt(&model, &image, normalize).unwrap();
            let diff = (h - ground_truth()).norm() / ground_truth().norm();
            assert!(diff < tol, "normalize={normalize}: relative error {diff}");
            assert!((h[(2, 2)] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn dlt_is_stable_under_noise() {
        let (model, image) = correspondences();
        let noise = GaussianPixelNoise {
            seed: 17,
            sigma_px: 0.3,
        };
        let noisy: Vec<Pt2> = image
            .iter()
            .enumerate()
            .map(|(i, p)| p + noise.sample(0, i))
            .collect();

        let h = dlt_homography(&model, &noisy).unwrap();
        for (p, uv) in model.iter().zip(&image) {
            let err = (apply_homography(&h, p) - uv).norm();
            assert!(err < 1.0, "reprojection error {err}");
        }
    }

    #[test]
    fn square_to_scaled_square() {
        let w = vec![
            Pt2::new(0.0, 0.0),
            Pt2::new(1.0, 0.0),
            Pt2::new(1.0, 1.0),
            Pt2::new(0.0, 1.0),
        ];
        let img: Vec<Pt2> = w.iter().map(|p| Pt2::new(2.0 * p.x, 2.0 * p.y)).collect();

        let h = dlt_homography(&w, &img).unwrap();
        assert!((h[(0, 0)] - 2.0).abs() < 1e-9);
        assert!((h[(1, 1)] - 2.0).abs() < 1e-9);
        assert!(h[(0, 2)].abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_input() {
        let (model, image) = correspondences();
        assert_eq!(
            HomographySolver::dlt(&model[..3], &image[..3], true),
            Err(HomographyError::NotEnoughPoints(3))
        );
        assert_eq!(
            HomographySolver::dlt(&model, &image[..5], true),
            Err(HomographyError::MismatchedLengths {
                model: 48,
                image: 5,
            })
        );
        let collapsed = vec![Pt2::new(10.0, 10.0); model.len()];
        assert_eq!(
            HomographySolver::dlt(&model, &collapsed, true),
            Err(HomographyError::DegenerateConfiguration)
        );
    }
}
