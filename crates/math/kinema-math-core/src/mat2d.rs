//! 2D affine transform: 2x2 column-major linear part plus translation.

use std::ops::{Index, Mul};

use serde::{Deserialize, Serialize};

use crate::scalar::{ieee_divide, nearly_zero, EPSILON};
use crate::vec::Float2;

/// Six scalars `[xx, xy, yx, yy, tx, ty]`: the x axis column `(xx, xy)`, the
/// y axis column `(yx, yy)`, and the translation `(tx, ty)`. A point maps to
/// `(xx*px + yx*py + tx, xy*px + yy*py + ty)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat2D([f32; 6]);

impl Default for Mat2D {
    fn default() -> Self {
        Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }
}

impl Mat2D {
    #[inline]
    pub fn new(xx: f32, xy: f32, yx: f32, yy: f32, tx: f32, ty: f32) -> Self {
        Self([xx, xy, yx, yy, tx, ty])
    }

    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    #[inline]
    pub fn from_scale(sx: f32, sy: f32) -> Self {
        Self([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    #[inline]
    pub fn from_rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self([cos, sin, -sin, cos, 0.0, 0.0])
    }

    #[inline]
    pub fn from_translation(tx: f32, ty: f32) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// Scale, then rotate, then translate.
    pub fn from_scale_rotation_translation(
        scale: Float2,
        radians: f32,
        translation: Float2,
    ) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self([
            cos * scale.x(),
            sin * scale.x(),
            -sin * scale.y(),
            cos * scale.y(),
            translation.x(),
            translation.y(),
        ])
    }

    #[inline]
    pub fn xx(&self) -> f32 {
        self.0[0]
    }
    #[inline]
    pub fn xy(&self) -> f32 {
        self.0[1]
    }
    #[inline]
    pub fn yx(&self) -> f32 {
        self.0[2]
    }
    #[inline]
    pub fn yy(&self) -> f32 {
        self.0[3]
    }
    #[inline]
    pub fn tx(&self) -> f32 {
        self.0[4]
    }
    #[inline]
    pub fn ty(&self) -> f32 {
        self.0[5]
    }

    #[inline]
    pub fn values(&self) -> &[f32; 6] {
        &self.0
    }

    #[inline]
    pub fn transform_point(&self, p: Float2) -> Float2 {
        Float2::new(
            self.xx() * p.x() + self.yx() * p.y() + self.tx(),
            self.xy() * p.x() + self.yy() * p.y() + self.ty(),
        )
    }

    /// Applies only the linear part (no translation).
    #[inline]
    pub fn transform_vector(&self, v: Float2) -> Float2 {
        Float2::new(
            self.xx() * v.x() + self.yx() * v.y(),
            self.xy() * v.x() + self.yy() * v.y(),
        )
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.xx() * self.yy() - self.yx() * self.xy()
    }

    /// Inverse transform, or `None` when the determinant is within
    /// [`EPSILON`] of zero.
    pub fn invert(&self) -> Option<Mat2D> {
        let det = self.determinant();
        if nearly_zero(det) || !det.is_finite() {
            return None;
        }
        let idet = ieee_divide(1.0, det);
        Some(Mat2D([
            self.yy() * idet,
            -self.xy() * idet,
            -self.yx() * idet,
            self.xx() * idet,
            (self.yx() * self.ty() - self.yy() * self.tx()) * idet,
            (self.xy() * self.tx() - self.xx() * self.ty()) * idet,
        ]))
    }

    /// Estimate of the largest factor by which this transform can stretch a
    /// unit vector: the largest singular value of the linear part, computed
    /// from the eigenvalues of `A^T A`.
    ///
    /// Returns 0 (never NaN, Inf, or negative) when the linear part is
    /// degenerate or its squares overflow. The translation lanes do not
    /// participate. Conservative within roughly 5% for composed transforms.
    pub fn find_max_scale(&self) -> f32 {
        let a = self.xx() * self.xx() + self.xy() * self.xy();
        let b = self.xx() * self.yx() + self.xy() * self.yy();
        let c = self.yx() * self.yx() + self.yy() * self.yy();
        if !a.is_finite() || !b.is_finite() || !c.is_finite() {
            return 0.0;
        }
        let b_sqd = b * b;
        let largest = if b_sqd <= EPSILON * EPSILON {
            // Off-diagonal is negligible; eigenvalues are the diagonal.
            if a > c {
                a
            } else {
                c
            }
        } else {
            let amc = a - c;
            0.5 * (a + c + (amc * amc + 4.0 * b_sqd).sqrt())
        };
        if !largest.is_finite() || largest < 0.0 {
            return 0.0;
        }
        largest.sqrt()
    }
}

/// Composition; `a * b` applies `b` first, then `a` (right-to-left).
impl Mul for Mat2D {
    type Output = Mat2D;

    fn mul(self, rhs: Mat2D) -> Mat2D {
        Mat2D([
            self.xx() * rhs.xx() + self.yx() * rhs.xy(),
            self.xy() * rhs.xx() + self.yy() * rhs.xy(),
            self.xx() * rhs.yx() + self.yx() * rhs.yy(),
            self.xy() * rhs.yx() + self.yy() * rhs.yy(),
            self.xx() * rhs.tx() + self.yx() * rhs.ty() + self.tx(),
            self.xy() * rhs.tx() + self.yy() * rhs.ty() + self.ty(),
        ])
    }
}

impl Index<usize> for Mat2D {
    type Output = f32;

    #[inline]
    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}
