//! Value interpolation on top of the numeric kernel's `mix`.

use kinema_math_core::{mix, Float2, Float4, Mat2D};

use crate::value::Value;

/// Linear interpolation across Value kinds.
///
/// All numeric kinds route through the kernel's `mix`, so the `t == 1`
/// precision caveat applies here too. `Bool` is step: the left value holds
/// for the entire blend (adapters see the right value once the fade
/// completes and the left instance is gone). Mismatched kinds prefer the
/// left value (fail-soft).
pub fn mix_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Float(va), Value::Float(vb)) => Value::Float(mix(*va, *vb, t)),
        (Value::Vec2(va), Value::Vec2(vb)) => {
            Value::Vec2(Float2::mix(Float2(*va), Float2(*vb), t).0)
        }
        (Value::Color(ca), Value::Color(cb)) => {
            Value::Color(Float4::mix(Float4(*ca), Float4(*cb), t).0)
        }
        (Value::Transform(ta), Value::Transform(tb)) => {
            let a = ta.values();
            let b = tb.values();
            let linear = Float4::mix(
                Float4([a[0], a[1], a[2], a[3]]),
                Float4([b[0], b[1], b[2], b[3]]),
                t,
            );
            let translation = Float2::mix(Float2([a[4], a[5]]), Float2([b[4], b[5]]), t);
            Value::Transform(Mat2D::new(
                linear[0],
                linear[1],
                linear[2],
                linear[3],
                translation[0],
                translation[1],
            ))
        }
        (Value::Bool(_), Value::Bool(_)) => a.clone(),
        _ => a.clone(),
    }
}
