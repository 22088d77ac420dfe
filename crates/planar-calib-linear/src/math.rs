//! Point normalization for DLT-style estimators.
//!
//! Normalizing points before building a design matrix centres the data and
//! fixes its scale, which keeps the SVD well conditioned regardless of the
//! units of the input (pixels, millimetres, ...).
//!
//! # Example
//!
//! ```
//! use planar_calib_linear::math::PointNormalization;
//! use planar_calib_core::Pt2;
//!
//! let points = vec![
//!     Pt2::new(100.0, 200.0),
//!     Pt2::new(150.0, 250.0),
//!     Pt2::new(120.0, 220.0),
//! ];
//! let norm = PointNormalization::from_points(&points).unwrap();
//! let normalized = norm.apply_all(&points);
//! // zero mean, mean squared distance from the origin = 2
//! let msd: f64 = normalized.iter().map(|p| p.coords.norm_squared()).sum::<f64>() / 3.0;
//! assert!((msd - 2.0).abs() < 1e-12);
//! ```

use planar_calib_core::{Mat3, Pt2, Real, Vec2};

/// Points whose spread is below this are treated as coincident.
const MIN_VARIANCE: Real = 1e-12;

/// Similarity transform `p ↦ s·(p − c)` mapping a point set to zero mean and
/// mean squared distance 2 from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointNormalization {
    /// Centroid `c` of the original points.
    pub centroid: Pt2,
    /// Isotropic scale `s`.
    pub scale: Real,
}

impl PointNormalization {
    /// Identity transform (used when normalization is disabled).
    pub fn identity() -> Self {
        Self {
            centroid: Pt2::origin(),
            scale: 1.0,
        }
    }

    /// Compute the normalization of `points`.
    ///
    /// Returns `None` for an empty set or when the points (nearly) coincide.
    pub fn from_points(points: &[Pt2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as Real;
        let centroid = Pt2::from(points.iter().map(|p| p.coords).sum::<Vec2>() / n);
        let msd = points
            .iter()
            .map(|p| (p - centroid).norm_squared())
            .sum::<Real>()
            / n;
        if msd <= MIN_VARIANCE {
            return None;
        }
        Some(Self {
            centroid,
            scale: (2.0 / msd).sqrt(),
        })
    }

    /// Normalize a single point.
    pub fn apply(&self, p: &Pt2) -> Pt2 {
        Pt2::from((p - self.centroid) * self.scale)
    }

    /// Normalize every point, preserving order.
    pub fn apply_all(&self, points: &[Pt2]) -> Vec<Pt2> {
        points.iter().map(|p| self.apply(p)).collect()
    }

    /// Homogeneous form `N` with `N·(x, y, 1)ᵀ = (s(x − cx), s(y − cy), 1)ᵀ`.
    pub fn matrix(&self) -> Mat3 {
        let s = self.scale;
        Mat3::new(
            s,
            0.0,
            -s * self.centroid.x,
            0.0,
            s,
            -s * self.centroid.y,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Closed-form inverse of [`Self::matrix`].
    pub fn inverse_matrix(&self) -> Mat3 {
        let inv = 1.0 / self.scale;
        Mat3::new(
            inv,
            0.0,
            self.centroid.x,
            0.0,
            inv,
            self.centroid.y,
            0.0,
            0.0,
            1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centres_and_scales() {
        let points = vec![
            Pt2::new(100.0, 200.0),
            Pt2::new(200.0, 300.0),
            Pt2::new(150.0, 250.0),
            Pt2::new(175.0, 210.0),
        ];
        let norm = PointNormalization::from_points(&points).unwrap();
        let out = norm.apply_all(&points);

        let cx: Real = out.iter().map(|p| p.x).sum::<Real>() / out.len() as Real;
        let cy: Real = out.iter().map(|p| p.y).sum::<Real>() / out.len() as Real;
        assert!(cx.abs() < 1e-12, "centroid x not at origin: {cx}");
        assert!(cy.abs() < 1e-12, "centroid y not at origin: {cy}");

        let msd: Real =
            out.iter().map(|p| p.coords.norm_squared()).sum::<Real>() / out.len() as Real;
        assert!((msd - 2.0).abs() < 1e-12, "mean squared distance {msd}");
    }

    #[test]
    fn matrix_and_inverse_agree_with_apply() {
        let points = vec![Pt2::new(3.0, -1.0), Pt2::new(7.0, 4.0), Pt2::new(-2.0, 5.0)];
        let norm = PointNormalization::from_points(&points).unwrap();
        let m = norm.matrix();
        for p in &points {
            let q = m * planar_calib_core::to_homogeneous(p);
            assert!((planar_calib_core::from_homogeneous(&q) - norm.apply(p)).norm() < 1e-12);
        }
        assert!((norm.inverse_matrix() * m - Mat3::identity()).norm() < 1e-12);
    }

    #[test]
    fn coincident_points_are_rejected() {
        let points = vec![Pt2::new(1.0, 1.0); 5];
        assert!(PointNormalization::from_points(&points).is_none());
        assert!(PointNormalization::from_points(&[]).is_none());
    }
}
