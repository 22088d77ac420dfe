//! Zhang's closed-form intrinsics from plane homographies.
//!
//! Every homography `H = λ·A·[r0 r1 t]` yields two constraints on the
//! symmetric matrix `B = A⁻ᵀ·A⁻¹` (up to scale):
//!
//! ```text
//! h0ᵀ·B·h1 = 0
//! h0ᵀ·B·h0 − h1ᵀ·B·h1 = 0
//! ```
//!
//! Stacked as `V·b = 0` with `b = (B00, B01, B11, B02, B12, B22)`. Once `b`
//! is known, `A` is recovered by a Cholesky factorization `B = L·Lᵀ`: since
//! `L` is a multiple of `A⁻ᵀ`, `A = L[2][2]·(L⁻¹)ᵀ`.
//!
//! Zhang's paper gives an equivalent explicit formula:
//!
//! ```text
//! vc = (B01·B02 − B00·B12) / (B00·B11 − B01²)
//! λ  = B22 − (B02² + vc·(B01·B02 − B00·B12)) / B00
//! α  = √(λ / B00)
//! β  = √(λ·B00 / (B00·B11 − B01²))
//! γ  = −B01·α²·β / λ
//! uc = γ·vc / β − B02·α² / λ
//! ```
//!
//! The factorization is used because it fails cleanly (non positive-definite
//! `B`) where the explicit formula would take square roots of negative numbers.

use nalgebra::{Cholesky, DMatrix, SVector};
use planar_calib_core::{solve_homogeneous_system, Intrinsics, LinalgError, Mat3, Real};
use thiserror::Error;

/// Errors raised by [`estimate_intrinsics_from_homographies`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntrinsicsError {
    #[error("need at least 2 homographies for intrinsics estimation, got {0}")]
    NotEnoughHomographies(usize),
    #[error("image of the absolute conic is not positive definite; views are degenerate")]
    NotPositiveDefinite,
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Build the 6-vector `v_ij(H)` of Zhang's method for columns `i`, `j`.
fn v_ij(hmtx: &Mat3, i: usize, j: usize) -> SVector<Real, 6> {
    let hi = hmtx.column(i);
    let hj = hmtx.column(j);

    SVector::<Real, 6>::from_row_slice(&[
        hi[0] * hj[0],
        hi[0] * hj[1] + hi[1] * hj[0],
        hi[1] * hj[1],
        hi[2] * hj[0] + hi[0] * hj[2],
        hi[2] * hj[1] + hi[1] * hj[2],
        hi[2] * hj[2],
    ])
}

/// Symmetric `B` from `b = (B00, B01, B11, B02, B12, B22)`.
fn b_matrix(b: &[Real]) -> Mat3 {
    Mat3::new(
        b[0], b[1], b[3], //
        b[1], b[2], b[4], //
        b[3], b[4], b[5],
    )
}

/// Estimate camera intrinsics from a set of plane homographies (no distortion).
///
/// Two homographies leave the system one constraint short; in that case a
/// zero-skew row is appended, so the result has `gamma == 0`.
pub fn estimate_intrinsics_from_homographies(
    hmtxs: &[Mat3],
) -> Result<Intrinsics, IntrinsicsError> {
    let m = hmtxs.len();
    if m < 2 {
        return Err(IntrinsicsError::NotEnoughHomographies(m));
    }

    let zero_skew = m == 2;
    let rows = 2 * m + usize::from(zero_skew);
    let mut vmtx = DMatrix::<Real>::zeros(rows, 6);

    for (k, hmtx) in hmtxs.iter().enumerate() {
        let v00 = v_ij(hmtx, 0, 0);
        let v11 = v_ij(hmtx, 1, 1);
        let v01 = v_ij(hmtx, 0, 1);

        vmtx.row_mut(2 * k).copy_from(&v01.transpose());
        vmtx.row_mut(2 * k + 1).copy_from(&(v00 - v11).transpose());
    }
    if zero_skew {
        vmtx[(2 * m, 1)] = 1.0;
    }

    let b = solve_homogeneous_system(&vmtx)?;
    let mut bmtx = b_matrix(b.as_slice());

    // b is only defined up to sign.
    if (0..3).any(|i| bmtx[(i, i)] < 0.0) {
        bmtx = -bmtx;
    }
    log::trace!("zhang: B = {bmtx}");

    let l = Cholesky::new(bmtx)
        .ok_or(IntrinsicsError::NotPositiveDefinite)?
        .l();
    let l_inv = l
        .try_inverse()
        .ok_or(IntrinsicsError::NotPositiveDefinite)?;
    let a = l_inv.transpose() * l[(2, 2)];

    Ok(Intrinsics::from_matrix(&a))
}
