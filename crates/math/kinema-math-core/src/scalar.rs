//! Scalar helpers shared by the vector and transform types.

pub const PI: f32 = std::f32::consts::PI;

/// Common threshold for detecting values near zero.
pub const EPSILON: f32 = 1.0 / 4096.0;

/// True when `a` is within [`EPSILON`] of zero.
#[inline]
pub fn nearly_zero(a: f32) -> bool {
    nearly_zero_within(a, EPSILON)
}

#[inline]
pub fn nearly_zero_within(a: f32, tolerance: f32) -> bool {
    debug_assert!(tolerance >= 0.0);
    a.abs() <= tolerance
}

/// True when `a` and `b` are within [`EPSILON`] of each other.
#[inline]
pub fn nearly_equal(a: f32, b: f32) -> bool {
    nearly_zero(b - a)
}

#[inline]
pub fn nearly_equal_within(a: f32, b: f32, tolerance: f32) -> bool {
    nearly_zero_within(b - a, tolerance)
}

/// Floating point division with conformant IEEE 754 behavior for NaN and Inf.
///
/// - Returns +/-Inf if `b == 0` (sign of `a`).
/// - Returns 0 if `b == +/-Inf`.
/// - Returns NaN if `a` and `b` are both zero.
/// - Returns NaN if `a` and `b` are both infinite.
/// - Returns NaN if `a` or `b` is NaN.
///
/// Never panics; Rust f32 division is already IEC 559 conformant, this
/// function exists to make the contract explicit at call sites.
#[inline]
pub fn ieee_divide(a: f32, b: f32) -> f32 {
    a / b
}

/// Linearly interpolates between `a` and `b`.
///
/// NOTE: mix(a, b, 1) !== b (!!)
///
/// The floating point numerics are not precise in the case where t == 1, but
/// this structure gets better overall precision than `a*(1 - t) + b*t` for
/// mid-range t, and `t == 0` returns exactly `a`.
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    (b - a) * t + a
}

/// Maximum error of [`fast_acos`], in radians (.96 degrees).
pub const FAST_ACOS_MAX_ERROR: f32 = 0.0167552;

/// Approximates acos(x) within 0.96 degrees, using the rational polynomial:
///
/// ```text
/// acos(x) ~= (bx^3 + ax) / (dx^4 + cx^2 + 1) + pi/2
/// ```
///
/// See: https://stackoverflow.com/a/36387954
#[inline]
pub fn fast_acos(x: f32) -> f32 {
    const A: f32 = -0.939115566365855;
    const B: f32 = 0.9217841528914573;
    const C: f32 = -1.2845906244690837;
    const D: f32 = 0.295624144969963174;
    const PI_OVER_2: f32 = 1.5707963267948966;
    let xx = x * x;
    let numer = B * xx + A;
    let denom = xx * (D * xx + C) + 1.0;
    x * (numer / denom) + PI_OVER_2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ieee_divide_table() {
        assert_eq!(ieee_divide(1.0, 0.0), f32::INFINITY);
        assert_eq!(ieee_divide(-1.0, 0.0), f32::NEG_INFINITY);
        assert_eq!(ieee_divide(1.0, f32::INFINITY), 0.0);
        assert_eq!(ieee_divide(1.0, f32::NEG_INFINITY), 0.0);
        assert!(ieee_divide(0.0, 0.0).is_nan());
        assert!(ieee_divide(f32::INFINITY, f32::INFINITY).is_nan());
        assert!(ieee_divide(f32::NAN, 1.0).is_nan());
        assert!(ieee_divide(1.0, f32::NAN).is_nan());
    }

    #[test]
    fn mix_endpoints() {
        assert_eq!(mix(3.0, 7.0, 0.0), 3.0);
        let mid = mix(3.0, 7.0, 0.5);
        assert!(mid > 3.0 && mid < 7.0);
        assert!((mid - 5.0).abs() < 1e-6);
    }

    #[test]
    fn tolerances() {
        assert!(nearly_zero(0.0));
        assert!(nearly_zero(EPSILON));
        assert!(!nearly_zero(EPSILON * 2.0));
        assert!(nearly_equal(1.0, 1.0 + EPSILON / 2.0));
        assert!(!nearly_equal(1.0, 1.01));
        assert!(nearly_equal_within(1.0, 1.05, 0.1));
    }

    #[test]
    fn fast_acos_error_bound() {
        let mut x = -1.0f32;
        while x <= 1.0 {
            let approx = fast_acos(x);
            let exact = x.acos();
            assert!(
                (approx - exact).abs() <= FAST_ACOS_MAX_ERROR,
                "x={x} approx={approx} exact={exact}"
            );
            x += 1.0 / 256.0;
        }
    }
}
