//! Deterministic noise helpers for synthetic datasets.
//!
//! Noise is derived from a SplitMix64 hash of `(seed, view, point)` rather
//! than a stateful RNG, so every sample is reproducible on its own.

use crate::{Pt2, Real, Vec2};

/// Deterministic uniform pixel noise in `[-max_abs_px, +max_abs_px]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UniformPixelNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute per-axis noise (pixels).
    pub max_abs_px: Real,
}

impl UniformPixelNoise {
    /// Sample a deterministic 2D noise vector (pixels) for a given `(view_idx, point_idx)` key.
    #[inline]
    pub fn sample(&self, view_idx: usize, point_idx: usize) -> Vec2 {
        let max_abs = self.max_abs_px.abs();
        if max_abs == 0.0 {
            return Vec2::zeros();
        }

        let (u, v) = unit_pair(self.seed, view_idx, point_idx);
        Vec2::new((u - 0.5) * 2.0 * max_abs, (v - 0.5) * 2.0 * max_abs)
    }

    /// Perturb every observation in place.
    pub fn apply_all(&self, observed: &mut [Vec<Pt2>]) {
        apply_with(observed, |v, p| self.sample(v, p));
    }
}

/// Deterministic zero-mean Gaussian pixel noise (Box-Muller).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianPixelNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Per-axis standard deviation (pixels).
    pub sigma_px: Real,
}

impl GaussianPixelNoise {
    /// Sample a deterministic 2D noise vector (pixels) for a given `(view_idx, point_idx)` key.
    pub fn sample(&self, view_idx: usize, point_idx: usize) -> Vec2 {
        let sigma = self.sigma_px.abs();
        if sigma == 0.0 {
            return Vec2::zeros();
        }

        let (u, v) = unit_pair(self.seed, view_idx, point_idx);
        // 1 - u lies in (0, 1], so the logarithm stays finite.
        let radius = (-2.0 * (1.0 - u).ln()).sqrt() * sigma;
        let angle = std::f64::consts::TAU * v;
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Perturb every observation in place.
    pub fn apply_all(&self, observed: &mut [Vec<Pt2>]) {
        apply_with(observed, |v, p| self.sample(v, p));
    }
}

fn apply_with(observed: &mut [Vec<Pt2>], sample: impl Fn(usize, usize) -> Vec2) {
    for (view_idx, view) in observed.iter_mut().enumerate() {
        for (point_idx, uv) in view.iter_mut().enumerate() {
            *uv += sample(view_idx, point_idx);
        }
    }
}

#[inline]
fn unit_pair(seed: u64, view_idx: usize, point_idx: usize) -> (Real, Real) {
    let key = seed
        ^ (view_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (point_idx as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    (
        u64_to_unit(splitmix64(key)),
        u64_to_unit(splitmix64(key ^ 0x94D0_49BB_1331_11EB)),
    )
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Top 53 bits as a double in `[0, 1)`.
#[inline]
fn u64_to_unit(x: u64) -> Real {
    (x >> 11) as Real * (1.0 / (1u64 << 53) as Real)
}
