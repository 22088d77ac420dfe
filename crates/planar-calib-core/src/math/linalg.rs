//! SVD-based solvers for homogeneous and overdetermined linear systems.

use super::Real;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

/// Errors raised by the dense linear solvers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    /// The system has no unknowns or no equations.
    #[error("empty linear system ({rows}x{cols})")]
    EmptySystem { rows: usize, cols: usize },
    /// Right-hand side length does not match the number of rows.
    #[error("right-hand side has {got} entries, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    /// The SVD did not produce the requested factors.
    #[error("svd failed")]
    SvdFailed,
}

/// Solve the homogeneous system `A·x = 0` subject to `‖x‖ = 1`.
///
/// Returns the right-singular vector of `A` associated with its smallest
/// singular value, which minimizes `‖A·x‖` over unit vectors. Matrices with
/// fewer rows than columns are padded with zero rows so that the SVD yields a
/// complete set of right-singular vectors.
///
/// When several singular values tie for the smallest one (a null space of
/// dimension > 1), any unit vector of that subspace is a valid minimizer and
/// the returned one is whichever the SVD happens to produce. Callers that can
/// hit this case must add constraints to the system.
pub fn solve_homogeneous_system(a: &DMatrix<Real>) -> Result<DVector<Real>, LinalgError> {
    let (rows, cols) = a.shape();
    if rows == 0 || cols == 0 {
        return Err(LinalgError::EmptySystem { rows, cols });
    }

    let a_work = if rows < cols {
        let mut a_pad = DMatrix::<Real>::zeros(cols, cols);
        a_pad.view_mut((0, 0), (rows, cols)).copy_from(a);
        a_pad
    } else {
        a.clone()
    };

    let svd = a_work.svd(false, true);
    let v_t = svd.v_t.ok_or(LinalgError::SvdFailed)?;

    let (idx, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .fold((0, Real::INFINITY), |(best_i, best_s), (i, &s)| {
            if s < best_s {
                (i, s)
            } else {
                (best_i, best_s)
            }
        });

    let x = v_t.row(idx).transpose();
    let norm = x.norm();
    if norm <= Real::EPSILON {
        return Err(LinalgError::SvdFailed);
    }
    Ok(x / norm)
}

/// Solve `A·x ≈ b` in the least-squares sense via the SVD pseudo-inverse.
///
/// Singular values below `1e-12 · σ_max` are treated as zero, giving the
/// minimum-norm solution for rank-deficient systems.
pub fn solve_least_squares(
    a: &DMatrix<Real>,
    b: &DVector<Real>,
) -> Result<DVector<Real>, LinalgError> {
    let (rows, cols) = a.shape();
    if rows == 0 || cols == 0 {
        return Err(LinalgError::EmptySystem { rows, cols });
    }
    if b.len() != rows {
        return Err(LinalgError::DimensionMismatch {
            expected: rows,
            got: b.len(),
        });
    }

    let svd = a.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    let eps = (1e-12 * s_max).max(Real::MIN_POSITIVE);
    svd.solve(b, eps).map_err(|_| LinalgError::SvdFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homogeneous_exact_rank_deficient() {
        // Rows are orthogonal to (1, -2, 1).
        let a = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 1.0, 1.0, 2.0, 1.0, 0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0],
        );
        let x = solve_homogeneous_system(&a).unwrap();
        assert!((x.norm() - 1.0).abs() < 1e-12);
        assert!((&a * &x).norm() < 1e-10, "residual {}", (&a * &x).norm());

        let expected = DVector::from_row_slice(&[1.0, -2.0, 1.0]).normalize();
        let dot = x.dot(&expected).abs();
        assert!((dot - 1.0).abs() < 1e-10);
    }

    #[test]
    fn homogeneous_least_squares_is_minimal() {
        let a = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 0.2, 0.0, 0.1, 2.0, 0.3, 0.0, 0.1, 0.5, 0.4, 0.0, 1.0],
        );
        let x = solve_homogeneous_system(&a).unwrap();
        assert!((x.norm() - 1.0).abs() < 1e-12);

        // No axis-aligned unit vector does better than the SVD minimizer.
        let r_min = (&a * &x).norm();
        for k in 0..3 {
            let mut e = DVector::zeros(3);
            e[k] = 1.0;
            assert!(r_min <= (&a * e).norm() + 1e-12);
        }

        // Smallest singular value equals the attained residual.
        let s_min = a.clone().svd(false, false).singular_values.min();
        assert!((r_min - s_min).abs() < 1e-10);
    }

    #[test]
    fn homogeneous_wide_matrix_is_padded() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let x = solve_homogeneous_system(&a).unwrap();
        assert!((x.norm() - 1.0).abs() < 1e-12);
        assert!((&a * &x).norm() < 1e-12);
        assert!((x[2].abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_system_is_rejected() {
        let a = DMatrix::<Real>::zeros(0, 3);
        assert!(matches!(
            solve_homogeneous_system(&a),
            Err(LinalgError::EmptySystem { .. })
        ));
    }

    #[test]
    fn least_squares_recovers_exact_solution() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_row_slice(&[2.0, -1.0, 1.0]);
        let x = solve_least_squares(&a, &b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-12);
        assert!((x[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn least_squares_rejects_mismatched_rhs() {
        let a = DMatrix::<Real>::identity(3, 2);
        let b = DVector::<Real>::zeros(2);
        assert_eq!(
            solve_least_squares(&a, &b),
            Err(LinalgError::DimensionMismatch {
                expected: 3,
                got: 2,
            })
        );
    }
}
