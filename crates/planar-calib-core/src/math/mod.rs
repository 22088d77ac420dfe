//! Mathematical utilities and type definitions.
//!
//! This module provides fundamental types used throughout the library
//! and the SVD-based solvers shared by the linear estimators.

use nalgebra::{Isometry3, Matrix3, Point2, Point3, Vector2, Vector3};

mod linalg;

pub use linalg::{solve_homogeneous_system, solve_least_squares, LinalgError};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 3D rigid transform (SE(3)) using [`Real`].
pub type Iso3 = Isometry3<Real>;

/// Convert a 2D point in Euclidean coordinates into homogeneous coordinates.
///
/// Given a point `p = (x, y)`, returns the homogeneous vector `(x, y, 1)`.
pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Convert a 3D homogeneous vector back to a 2D point.
///
/// The input is interpreted as `(x, y, w)` and the result is `(x / w, y / w)`.
/// The caller is responsible for ensuring that `w != 0`.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Map a model-plane point through a homography: `x' ~ H x`.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Pt2 {
    from_homogeneous(&(h * to_homogeneous(p)))
}

/// Rescale a homography so that `H[2][2] = 1`.
///
/// Left unchanged when `|H[2][2]|` is too small to divide by.
pub fn normalize_homography(h: &Mat3) -> Mat3 {
    let s = h[(2, 2)];
    if s.abs() > Real::EPSILON {
        h / s
    } else {
        *h
    }
}

/// Lift a model-plane point onto the `Z = 0` plane of the target frame.
pub fn planar_to_3d(p: &Pt2) -> Pt3 {
    Pt3::new(p.x, p.y, 0.0)
}

/// Skew-symmetric cross-product matrix `[v]ₓ` such that `[v]ₓ w = v × w`.
pub fn skew(v: &Vec3) -> Mat3 {
    Mat3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}
