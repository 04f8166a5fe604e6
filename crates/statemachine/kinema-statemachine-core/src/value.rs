//! Animated property values produced by sampling and blending.

use kinema_math_core::Mat2D;
use serde::{Deserialize, Serialize};

/// Lightweight kind enum for dispatch without cloning.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Bool,
    Vec2,
    Color,
    Transform,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Boolean (step, never interpolated)
    Bool(bool),

    /// 2D vector
    Vec2([f32; 2]),

    /// RGBA color (linear by convention)
    Color([f32; 4]),

    /// 2D affine transform
    Transform(Mat2D),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Color(_) => ValueKind::Color,
            Value::Transform(_) => ValueKind::Transform,
        }
    }
}
