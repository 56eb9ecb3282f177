// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! Layer transforms are stored in the same 4×4 layout that Core Animation and
//! GPU backends consume, even though the gloss engine only ever produces 2-D
//! affine transforms (translations and rotations about the Z axis). The
//! [`to_affine`](Transform3d::to_affine) / [`from_affine`](Transform3d::from_affine)
//! pair bridges to [`kurbo::Affine`] for point mapping and inversion.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs and Core Animation's `CATransform3D`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        #[cfg(feature = "std")]
        let (s, c) = radians.sin_cos();
        #[cfg(not(feature = "std"))]
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis through `center`.
    ///
    /// Equivalent to `T(center) * R(radians) * T(-center)`, so `center` is a
    /// fixed point of the result.
    #[inline]
    #[must_use]
    pub fn from_rotation_about(radians: f64, center: Point) -> Self {
        Self::from_translation(center.x, center.y, 0.0)
            * Self::from_rotation_z(radians)
            * Self::from_translation(-center.x, -center.y, 0.0)
    }

    /// Embeds a 2-D affine transform in the XY plane.
    #[inline]
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self {
            cols: [
                [a, b, 0.0, 0.0],
                [c, d, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [e, f, 0.0, 1.0],
            ],
        }
    }

    /// Projects this transform onto the XY plane as a 2-D affine transform.
    ///
    /// Z and perspective terms are discarded.
    #[inline]
    #[must_use]
    pub fn to_affine(self) -> Affine {
        let c = &self.cols;
        Affine::new([c[0][0], c[0][1], c[1][0], c[1][1], c[3][0], c[3][1]])
    }

    /// Returns the XY translation component.
    #[inline]
    #[must_use]
    pub const fn translation(self) -> Vec2 {
        Vec2::new(self.cols[3][0], self.cols[3][1])
    }

    /// Returns `self` composed with itself `n` times (`self^n`).
    ///
    /// `n == 0` yields [`IDENTITY`](Self::IDENTITY).
    #[must_use]
    pub fn powi(self, n: u32) -> Self {
        let mut out = Self::IDENTITY;
        for _ in 0..n {
            out = out * self;
        }
        out
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Transform3d::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
    }

    #[test]
    fn translation_composition() {
        let a = Transform3d::from_translation(1.0, 0.0, 0.0);
        let b = Transform3d::from_translation(0.0, 2.0, 0.0);
        let c = a * b;
        assert_eq!(c.col(3), [1.0, 2.0, 0.0, 1.0]);
        assert_eq!(c.translation(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn rotation_z_ninety_degrees() {
        let r = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2);
        assert!((r.col(0)[0] - 0.0).abs() < EPS);
        assert!((r.col(0)[1] - 1.0).abs() < EPS);
        assert!((r.col(1)[0] + 1.0).abs() < EPS);
        assert!((r.col(1)[1] - 0.0).abs() < EPS);
    }

    #[test]
    fn zero_rotation_about_point_is_identity() {
        let r = Transform3d::from_rotation_about(0.0, Point::new(50.0, 20.0));
        assert_eq!(r, Transform3d::IDENTITY);
    }

    #[test]
    fn rotation_about_keeps_center_fixed() {
        let center = Point::new(50.0, 20.0);
        let r = Transform3d::from_rotation_about(1.1, center).to_affine();
        let mapped = r * center;
        assert!((mapped.x - center.x).abs() < EPS, "got {mapped:?}");
        assert!((mapped.y - center.y).abs() < EPS, "got {mapped:?}");
    }

    #[test]
    fn affine_bridge_preserves_mapping() {
        let affine = Affine::rotate(0.3).then_translate(Vec2::new(4.0, -2.0));
        let t = Transform3d::from_affine(affine);
        let p = Point::new(3.0, 7.0);
        let a = affine * p;
        let b = t.to_affine() * p;
        assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
    }

    #[test]
    fn powi_repeats_translation() {
        let step = Transform3d::from_translation(10.0, 0.0, 0.0);
        assert_eq!(step.powi(0), Transform3d::IDENTITY);
        assert_eq!(step.powi(1), step);
        assert_eq!(step.powi(3).translation(), Vec2::new(30.0, 0.0));
    }

    #[test]
    fn non_finite_detected() {
        let mut t = Transform3d::IDENTITY;
        assert!(t.is_finite());
        t.cols[2][1] = f64::NAN;
        assert!(!t.is_finite());
        t.cols[2][1] = f64::INFINITY;
        assert!(!t.is_finite());
    }
}
