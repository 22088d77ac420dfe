//! Closed-form derivatives shared by the refinement problems.

pub mod projection;
