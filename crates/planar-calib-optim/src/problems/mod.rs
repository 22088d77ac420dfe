//! Refinement problems built on the LM backend.

pub mod homography;
pub mod planar_intrinsics;
