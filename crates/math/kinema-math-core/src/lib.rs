//! Kinema math core (engine-agnostic).
//!
//! This crate is the numeric leaf of the Kinema runtime: fixed-width vector
//! types with a deterministic NaN/Inf policy, scalar tolerance helpers, and
//! the 2D affine transform used by the blending engine. The state-machine
//! crate builds on these; nothing here allocates or errors at runtime.

pub mod mat2d;
pub mod scalar;
pub mod vec;

pub use mat2d::Mat2D;
pub use scalar::{
    fast_acos, ieee_divide, mix, nearly_equal, nearly_equal_within, nearly_zero,
    nearly_zero_within, EPSILON, FAST_ACOS_MAX_ERROR, PI,
};
pub use vec::{Float2, Float4, Int2, Int4};
