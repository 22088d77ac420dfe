//! Camera model building blocks.
//!
//! - [`Intrinsics`]: the upper-triangular intrinsic matrix `A`,
//! - [`RadialDistortion`]: polynomial radial warp and its numeric inverse,
//! - [`Camera`]: intrinsics + distortion, forward projection,
//! - [`ViewTransform`]: per-view extrinsics in Rodrigues form.
//!
//! All of them are plain values: every pipeline stage builds new instances
//! instead of mutating the ones produced earlier.

mod camera;
mod distortion;
mod intrinsics;
mod view_transform;

pub use camera::*;
pub use distortion::*;
pub use intrinsics::*;
pub use view_transform::*;
