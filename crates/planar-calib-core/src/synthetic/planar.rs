//! Synthetic planar target helpers.
//!
//! Model points live on the `Z = 0` plane. Views are generated so the grid
//! centre lands on (or near) the optical axis at a chosen depth.

use crate::{Camera, Pt2, Real, Vec2, Vec3, ViewTransform};

/// Generate a planar grid of `nx * ny` model points.
///
/// Points are ordered deterministically in row-major order (Y major):
/// `(x = 0..nx-1, y = 0..ny-1)`.
pub fn grid_points(nx: usize, ny: usize, spacing: Real) -> Vec<Pt2> {
    let mut points = Vec::with_capacity(nx.saturating_mul(ny));
    for j in 0..ny {
        for i in 0..nx {
            points.push(Pt2::new(i as Real * spacing, j as Real * spacing));
        }
    }
    points
}

/// Centroid of a set of model points.
pub fn centroid(model: &[Pt2]) -> Pt2 {
    if model.is_empty() {
        return Pt2::origin();
    }
    let sum = model.iter().fold(Vec2::zeros(), |acc, p| acc + p.coords);
    Pt2::from(sum / model.len() as Real)
}

/// A view with the given rotation that places the model point `anchor` at `position`
/// in camera coordinates.
pub fn view_looking_at(rotation: Vec3, anchor: &Pt2, position: Vec3) -> ViewTransform {
    let r = ViewTransform::new(rotation, Vec3::zeros()).rotation_matrix();
    let rotated = r * Vec3::new(anchor.x, anchor.y, 0.0);
    ViewTransform::new(rotation, position - rotated)
}

/// Rotation vectors used by [`default_views`]; tilted enough to make the
/// intrinsics well conditioned.
const DEFAULT_ROTATIONS: [[Real; 3]; 6] = [
    [0.30, 0.10, 0.05],
    [-0.25, 0.30, -0.10],
    [0.10, -0.35, 0.20],
    [0.40, 0.20, 0.00],
    [-0.20, -0.20, 0.30],
    [0.15, 0.40, -0.25],
];

/// Generate `n_views` varied views of `model`, its centroid near `(0, 0, depth)`.
///
/// Rotations and small lateral offsets cycle through a fixed table; depth
/// grows by 5% per view.
pub fn default_views(n_views: usize, model: &[Pt2], depth: Real) -> Vec<ViewTransform> {
    let centre = centroid(model);
    (0..n_views)
        .map(|i| {
            let r = DEFAULT_ROTATIONS[i % DEFAULT_ROTATIONS.len()];
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let position = Vec3::new(
                sign * 0.02 * depth,
                -sign * 0.015 * depth,
                depth * (1.0 + 0.05 * i as Real),
            );
            view_looking_at(Vec3::new(r[0], r[1], r[2]), &centre, position)
        })
        .collect()
}

/// Project the model into every view.
pub fn project_views(camera: &Camera, views: &[ViewTransform], model: &[Pt2]) -> Vec<Vec<Pt2>> {
    views
        .iter()
        .map(|view| camera.project_all(view, model))
        .collect()
}
