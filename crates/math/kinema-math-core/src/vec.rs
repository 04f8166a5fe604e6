//! Fixed-width vector types with a deterministic NaN/Inf policy.
//!
//! These are plain arrays with elementwise operators; the point is not SIMD
//! codegen but the exact numeric policy the blending math depends on:
//!
//! - `min`/`max`: if exactly one operand is NaN, the non-NaN operand wins.
//! - `clamp(x, lo, hi)` always returns a value between `lo` and `hi`:
//!   returns `lo` where `x` is NaN, ignores `lo`/`hi` where *they* are NaN,
//!   and returns `hi` wherever `hi <= lo`.
//! - Integer `abs` at the minimum representable value returns that value
//!   unchanged (no overflow).
//! - Division is IEEE 754: never panics, Inf/NaN flow through as defined.

use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::scalar;

// Lane-level select forms; the negation in `abs` happens on the "true" side
// so NaN is never negated.
#[inline]
fn min_lane(a: f32, b: f32) -> f32 {
    if b < a || a.is_nan() {
        b
    } else {
        a
    }
}

#[inline]
fn max_lane(a: f32, b: f32) -> f32 {
    if a < b || a.is_nan() {
        b
    } else {
        a
    }
}

macro_rules! float_vec {
    ($name:ident, $n:expr) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub [f32; $n]);

        impl $name {
            #[inline]
            pub fn splat(v: f32) -> Self {
                Self([v; $n])
            }

            #[inline]
            fn map2(self, rhs: Self, f: impl Fn(f32, f32) -> f32) -> Self {
                let mut out = [0.0; $n];
                for i in 0..$n {
                    out[i] = f(self.0[i], rhs.0[i]);
                }
                Self(out)
            }

            #[inline]
            fn map(self, f: impl Fn(f32) -> f32) -> Self {
                let mut out = [0.0; $n];
                for i in 0..$n {
                    out[i] = f(self.0[i]);
                }
                Self(out)
            }

            /// Elementwise minimum. If one lane operand is NaN and the other
            /// is not, returns whichever is _not_ NaN.
            #[inline]
            pub fn min(self, rhs: Self) -> Self {
                self.map2(rhs, min_lane)
            }

            /// Elementwise maximum. If one lane operand is NaN and the other
            /// is not, returns whichever is _not_ NaN.
            #[inline]
            pub fn max(self, rhs: Self) -> Self {
                self.map2(rhs, max_lane)
            }

            /// Unlike `f32::clamp`, always returns a value between `lo` and
            /// `hi`: `lo` where `self` is NaN, `hi` wherever `hi <= lo`, and
            /// NaN bounds are ignored.
            #[inline]
            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                lo.max(self).min(hi)
            }

            #[inline]
            pub fn abs(self) -> Self {
                self.map(|x| if x < 0.0 { -x } else { x })
            }

            #[inline]
            pub fn sqrt(self) -> Self {
                self.map(f32::sqrt)
            }

            #[inline]
            pub fn floor(self) -> Self {
                self.map(f32::floor)
            }

            /// See [`scalar::fast_acos`]; applied lanewise.
            #[inline]
            pub fn fast_acos(self) -> Self {
                self.map(scalar::fast_acos)
            }

            /// Linearly interpolates between `a` and `b`; see [`scalar::mix`]
            /// for the `t == 1` precision caveat.
            #[inline]
            pub fn mix(a: Self, b: Self, t: f32) -> Self {
                a.map2(b, |x, y| scalar::mix(x, y, t))
            }

            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                let mut s = 0.0;
                for i in 0..$n {
                    s += self.0[i] * rhs.0[i];
                }
                s
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.dot(self).sqrt()
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a + b)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a - b)
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.map2(rhs, |a, b| a * b)
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                self.map(|a| a * rhs)
            }
        }

        /// Elementwise IEEE 754 division; see [`scalar::ieee_divide`].
        impl Div for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: Self) -> Self {
                self.map2(rhs, scalar::ieee_divide)
            }
        }

        impl Div<f32> for $name {
            type Output = Self;
            #[inline]
            fn div(self, rhs: f32) -> Self {
                self.map(|a| scalar::ieee_divide(a, rhs))
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                self.map(|a| -a)
            }
        }

        impl Index<usize> for $name {
            type Output = f32;
            #[inline]
            fn index(&self, i: usize) -> &f32 {
                &self.0[i]
            }
        }

        impl IndexMut<usize> for $name {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut f32 {
                &mut self.0[i]
            }
        }
    };
}

float_vec!(Float2, 2);
float_vec!(Float4, 4);

impl Float2 {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self([x, y])
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.0[1]
    }

    /// 2D cross product (z component of the 3D cross).
    #[inline]
    pub fn cross(self, rhs: Self) -> f32 {
        self.x() * rhs.y() - self.y() * rhs.x()
    }

    #[inline]
    pub fn normalized(self) -> Self {
        let len = self.length();
        Self([
            scalar::ieee_divide(self.x(), len),
            scalar::ieee_divide(self.y(), len),
        ])
    }
}

macro_rules! int_vec {
    ($name:ident, $n:expr) => {
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub [i32; $n]);

        impl $name {
            #[inline]
            pub fn splat(v: i32) -> Self {
                Self([v; $n])
            }

            #[inline]
            fn map2(self, rhs: Self, f: impl Fn(i32, i32) -> i32) -> Self {
                let mut out = [0; $n];
                for i in 0..$n {
                    out[i] = f(self.0[i], rhs.0[i]);
                }
                Self(out)
            }

            #[inline]
            pub fn min(self, rhs: Self) -> Self {
                self.map2(rhs, i32::min)
            }

            #[inline]
            pub fn max(self, rhs: Self) -> Self {
                self.map2(rhs, i32::max)
            }

            #[inline]
            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                lo.max(self).min(hi)
            }

            /// Elementwise absolute value, with one exception: a lane equal
            /// to `i32::MIN` is returned unchanged.
            #[inline]
            pub fn abs(self) -> Self {
                let mut out = self.0;
                for v in &mut out {
                    *v = v.wrapping_abs();
                }
                Self(out)
            }

            #[inline]
            pub fn dot(self, rhs: Self) -> i32 {
                let mut s = 0i32;
                for i in 0..$n {
                    s = s.wrapping_add(self.0[i].wrapping_mul(rhs.0[i]));
                }
                s
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                self.map2(rhs, i32::wrapping_add)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.map2(rhs, i32::wrapping_sub)
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: Self) -> Self {
                self.map2(rhs, i32::wrapping_mul)
            }
        }

        impl Index<usize> for $name {
            type Output = i32;
            #[inline]
            fn index(&self, i: usize) -> &i32 {
                &self.0[i]
            }
        }
    };
}

int_vec!(Int2, 2);
int_vec!(Int4, 4);
