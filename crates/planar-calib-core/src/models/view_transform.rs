use crate::{Iso3, Mat3, Pt3, Real, Vec3};
use nalgebra::{Rotation3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of entries of a flattened view transform.
pub const VIEW_DIM: usize = 6;

/// Largest Frobenius distance between a candidate rotation matrix and its
/// orthogonal repair that is still accepted.
pub const ORTHOGONALITY_TOLERANCE: Real = 0.25;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ViewTransformError {
    #[error("matrix deviates from the nearest rotation by {deviation:.3e} (tolerance {tolerance:.3e})")]
    NotOrthogonal { deviation: Real, tolerance: Real },
    #[error("matrix has non-positive determinant {0:.3e} and cannot be a rotation")]
    NotProperRotation(Real),
    #[error("view parameter vector needs {VIEW_DIM} entries, got {0}")]
    WrongParameterCount(usize),
    #[error("svd failed while repairing the rotation matrix")]
    SvdFailed,
}

/// Extrinsic parameters of one view: the rigid motion that carries target
/// (world) coordinates into camera coordinates, `Xc = R·X + t`.
///
/// The rotation is stored in angle-axis (Rodrigues) form: direction is the
/// rotation axis, norm is the angle in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    rotation: Vec3,
    translation: Vec3,
}

impl ViewTransform {
    /// Build from a Rodrigues vector and a translation.
    pub fn new(rotation: Vec3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }

    /// Build from an approximate rotation matrix and a translation.
    ///
    /// The matrix is projected onto SO(3) (polar decomposition via SVD). It is
    /// rejected when its determinant is not positive or when the repair moves
    /// it by more than [`ORTHOGONALITY_TOLERANCE`] in Frobenius norm.
    pub fn from_rotation_matrix(r: &Mat3, translation: Vec3) -> Result<Self, ViewTransformError> {
        let det = r.determinant();
        if det.is_nan() || det <= 0.0 {
            return Err(ViewTransformError::NotProperRotation(det));
        }

        let svd = r.svd(true, true);
        let u = svd.u.ok_or(ViewTransformError::SvdFailed)?;
        let v_t = svd.v_t.ok_or(ViewTransformError::SvdFailed)?;
        let r_orth = u * v_t;

        let deviation = (r - r_orth).norm();
        if deviation > ORTHOGONALITY_TOLERANCE {
            return Err(ViewTransformError::NotOrthogonal {
                deviation,
                tolerance: ORTHOGONALITY_TOLERANCE,
            });
        }

        let rotation = Rotation3::from_matrix_unchecked(r_orth).scaled_axis();
        Ok(Self::new(rotation, translation))
    }

    /// Build from `(rx, ry, rz, tx, ty, tz)`.
    pub fn from_parameters(params: &[Real]) -> Result<Self, ViewTransformError> {
        if params.len() != VIEW_DIM {
            return Err(ViewTransformError::WrongParameterCount(params.len()));
        }
        Ok(Self::new(
            Vec3::new(params[0], params[1], params[2]),
            Vec3::new(params[3], params[4], params[5]),
        ))
    }

    /// Flattened `(rx, ry, rz, tx, ty, tz)`.
    pub fn parameters(&self) -> [Real; VIEW_DIM] {
        let r = &self.rotation;
        let t = &self.translation;
        [r.x, r.y, r.z, t.x, t.y, t.z]
    }

    /// Rodrigues rotation vector (axis scaled by angle).
    pub fn rotation_vector(&self) -> Vec3 {
        self.rotation
    }

    /// Orthonormal 3×3 rotation matrix.
    pub fn rotation_matrix(&self) -> Mat3 {
        Rotation3::new(self.rotation).into_inner()
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Carry a world point into camera coordinates: `R·X + t`.
    pub fn apply_to(&self, x: &Pt3) -> Pt3 {
        Rotation3::new(self.rotation) * x + self.translation
    }

    pub fn to_isometry(&self) -> Iso3 {
        Iso3::from_parts(
            Translation3::from(self.translation),
            UnitQuaternion::from_scaled_axis(self.rotation),
        )
    }

    pub fn from_isometry(iso: &Iso3) -> Self {
        Self::new(iso.rotation.scaled_axis(), iso.translation.vector)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
