//! Projection of a model point and its analytic derivatives.
//!
//! The camera chain for a model point `X = (px, py, 0)` is
//!
//! ```text
//! Xc = R(w)·X + t                       view transform
//! (x, y) = (Xc.x / Xc.z, Xc.y / Xc.z)   perspective division
//! (xd, yd) = (x, y)·D(r²)               radial distortion, D = 1 + Σ kᵢ·r^(2i+2)
//! u = α·xd + γ·yd + uc,  v = β·yd + vc   intrinsic mapping
//! ```
//!
//! and [`projection_jacobian`] differentiates it link by link.

use nalgebra::{Matrix2, Matrix2x3, Matrix2x6, Matrix2xX, Matrix3x6};
use planar_calib_core::{
    planar_to_3d, skew, Camera, Mat3, Pt2, Real, Vec2, Vec3, ViewTransform, INTRINSICS_DIM,
};

/// Below this rotation angle the small-angle expansion of the rotation
/// derivative is used.
const SMALL_ANGLE: Real = 1e-6;

/// Pixel of a model point together with its derivatives.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionJacobian {
    /// Projected pixel.
    pub uv: Pt2,
    /// `∂(u, v) / ∂(alpha, beta, gamma, uc, vc, k0, …)`.
    pub d_camera: Matrix2xX<Real>,
    /// `∂(u, v) / ∂(rx, ry, rz, tx, ty, tz)`.
    pub d_view: Matrix2x6<Real>,
}

/// `∂(R(w)·x) / ∂w` for a Rodrigues vector `w`.
///
/// Uses the compact form `−R·[x]ₓ·(w·wᵀ + (Rᵀ − I)·[w]ₓ) / ‖w‖²`
/// (Gallego & Yezzi, 2015). Near `w = 0` the first-order expansion
/// `−R·[x]ₓ·(I − ½[w]ₓ)` is used instead.
pub fn rotation_jacobian(w: &Vec3, x: &Vec3) -> Mat3 {
    let r = ViewTransform::new(*w, Vec3::zeros()).rotation_matrix();
    let theta2 = w.norm_squared();
    let right = if theta2.sqrt() < SMALL_ANGLE {
        Mat3::identity() - skew(w) * 0.5
    } else {
        (w * w.transpose() + (r.transpose() - Mat3::identity()) * skew(w)) / theta2
    };
    -r * skew(x) * right
}

/// Project model point `p` through `camera` and `view` and differentiate the
/// pixel with respect to the camera and view parameters.
pub fn projection_jacobian(camera: &Camera, view: &ViewTransform, p: &Pt2) -> ProjectionJacobian {
    let x_model = planar_to_3d(p).coords;
    let pc = view.apply_to(&planar_to_3d(p)).coords;
    let inv_z = 1.0 / pc.z;
    let xy = Vec2::new(pc.x * inv_z, pc.y * inv_z);
    let (x, y) = (xy.x, xy.y);
    let r2 = xy.norm_squared();

    let coeffs = &camera.distortion.coefficients;
    let mut factor = 1.0;
    let mut d_factor_d_r2 = 0.0;
    let mut r_pow = 1.0;
    for (i, k) in coeffs.iter().enumerate() {
        d_factor_d_r2 += (i + 1) as Real * k * r_pow;
        r_pow *= r2;
        factor += k * r_pow;
    }
    let (xd, yd) = (x * factor, y * factor);

    let intr = &camera.intrinsics;
    let uv = Pt2::new(
        intr.alpha * xd + intr.gamma * yd + intr.uc,
        intr.beta * yd + intr.vc,
    );

    // Camera block: alpha, beta, gamma, uc, vc, k0, k1, ...
    let mut d_camera = Matrix2xX::<Real>::zeros(INTRINSICS_DIM + coeffs.len());
    d_camera[(0, 0)] = xd;
    d_camera[(0, 2)] = yd;
    d_camera[(0, 3)] = 1.0;
    d_camera[(1, 1)] = yd;
    d_camera[(1, 4)] = 1.0;
    let u_lin = intr.alpha * x + intr.gamma * y;
    let v_lin = intr.beta * y;
    let mut r_pow = r2;
    for i in 0..coeffs.len() {
        d_camera[(0, INTRINSICS_DIM + i)] = u_lin * r_pow;
        d_camera[(1, INTRINSICS_DIM + i)] = v_lin * r_pow;
        r_pow *= r2;
    }

    // View block: sensor <- distorted <- normalized <- camera frame <- (w, t).
    let d_uv_d_dist = Matrix2::new(intr.alpha, intr.gamma, 0.0, intr.beta);
    let d_factor_dx = 2.0 * x * d_factor_d_r2;
    let d_factor_dy = 2.0 * y * d_factor_d_r2;
    let d_dist_d_norm = Matrix2::new(
        factor + x * d_factor_dx,
        x * d_factor_dy,
        y * d_factor_dx,
        factor + y * d_factor_dy,
    );
    let d_norm_d_pc = Matrix2x3::new(inv_z, 0.0, -x * inv_z, 0.0, inv_z, -y * inv_z);
    let mut d_pc_d_view = Matrix3x6::<Real>::zeros();
    d_pc_d_view
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&rotation_jacobian(&view.rotation_vector(), &x_model));
    d_pc_d_view
        .fixed_view_mut::<3, 3>(0, 3)
        .copy_from(&Mat3::identity());

    let d_view = d_uv_d_dist * d_dist_d_norm * d_norm_d_pc * d_pc_d_view;

    ProjectionJacobian {
        uv,
        d_camera,
        d_view,
    }
}
