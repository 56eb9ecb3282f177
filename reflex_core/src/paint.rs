// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint primitives: colors, linear gradients, and instance replication.
//!
//! These are the leaf building blocks of the gloss scene graph. A
//! [`LinearGradient`] is the reflective band itself; a [`Replicator`] tiles
//! its children along a fixed per-instance transform.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;

use crate::transform::Transform3d;

/// Number of gloss band instances drawn by the engine's replicator.
///
/// Two instances are enough to cover the hand-off as one band scrolls off an
/// edge and the next scrolls in.
pub const GLOSS_INSTANCE_COUNT: u32 = 2;

/// A straight-alpha RGBA color with `f32` components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from components.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns this color with its alpha replaced.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Linearly interpolates each component; `t` is not clamped.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

/// A color at a normalized position along a gradient axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the axis, in `[0, 1]`.
    pub location: f32,
    /// Color at this position.
    pub color: Color,
}

impl ColorStop {
    /// Creates a stop.
    #[inline]
    #[must_use]
    pub const fn new(location: f32, color: Color) -> Self {
        Self { location, color }
    }
}

/// A linear gradient painted over a layer's bounds.
///
/// `start` and `end` are in unit space: `(0, 0)` is the bounds' top-left
/// corner and `(1, 1)` its bottom-right. Stops are expected in ascending
/// `location` order.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Unit-space point where the axis begins.
    pub start: Point,
    /// Unit-space point where the axis ends.
    pub end: Point,
    /// Color stops, ascending by location.
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    /// The reflective band: transparent → opaque black → transparent, left to
    /// right across the bounds.
    ///
    /// Translucency is left to whoever installs the mask; the band's own alpha
    /// ramp is exactly `{0, 1, 0}`.
    #[must_use]
    pub fn gloss() -> Self {
        Self {
            start: Point::ZERO,
            end: Point::new(1.0, 0.0),
            stops: vec![
                ColorStop::new(0.0, Color::CLEAR),
                ColorStop::new(0.5, Color::BLACK),
                ColorStop::new(1.0, Color::CLEAR),
            ],
        }
    }

    /// Evaluates the gradient at a unit-space point.
    ///
    /// The point is projected onto the `start → end` axis and clamped to the
    /// end stops. A degenerate axis (`start == end`) evaluates to the first
    /// stop. An empty stop list evaluates to [`Color::CLEAR`].
    #[must_use]
    pub fn color_at(&self, unit: Point) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::CLEAR;
        };
        let axis = self.end - self.start;
        let len2 = axis.hypot2();
        if len2 == 0.0 {
            return first.color;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "gradient positions only need f32 precision"
        )]
        let t = ((unit - self.start).dot(axis) / len2).clamp(0.0, 1.0) as f32;

        if t <= first.location {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.location {
                let span = b.location - a.location;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.location) / span);
            }
        }
        last.color
    }
}

/// Draws a layer's children several times, each instance transformed by one
/// more application of `instance_transform` than the previous.
///
/// Instances are derived copies: changing the template children or the
/// instance transform affects every instance uniformly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Replicator {
    /// How many times the children are drawn.
    pub instance_count: u32,
    /// Transform applied between consecutive instances.
    pub instance_transform: Transform3d,
}

impl Replicator {
    /// A replicator that steps each instance `spacing` units along +X.
    #[inline]
    #[must_use]
    pub const fn horizontal(instance_count: u32, spacing: f64) -> Self {
        Self {
            instance_count,
            instance_transform: Transform3d::from_translation(spacing, 0.0, 0.0),
        }
    }

    /// Returns the X translation between consecutive instances.
    #[inline]
    #[must_use]
    pub const fn spacing(&self) -> f64 {
        self.instance_transform.cols[3][0]
    }

    /// Returns the transform of instance `k` (`instance_transform^k`).
    #[inline]
    #[must_use]
    pub fn instance(&self, k: u32) -> Transform3d {
        self.instance_transform.powi(k)
    }

    /// Iterates the transforms of all instances, in draw order.
    pub fn instances(&self) -> impl Iterator<Item = Transform3d> + '_ {
        (0..self.instance_count).map(|k| self.instance(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn gloss_alpha_ramp() {
        let g = LinearGradient::gloss();
        assert!(g.color_at(Point::new(0.0, 0.5)).a.abs() < EPS);
        assert!((g.color_at(Point::new(0.5, 0.5)).a - 1.0).abs() < EPS);
        assert!(g.color_at(Point::new(1.0, 0.5)).a.abs() < EPS);
        assert!((g.color_at(Point::new(0.25, 0.0)).a - 0.5).abs() < EPS);
    }

    #[test]
    fn gloss_is_vertical_invariant() {
        let g = LinearGradient::gloss();
        let top = g.color_at(Point::new(0.3, 0.0));
        let bottom = g.color_at(Point::new(0.3, 1.0));
        assert_eq!(top, bottom);
    }

    #[test]
    fn points_outside_axis_clamp_to_end_stops() {
        let g = LinearGradient::gloss();
        assert_eq!(g.color_at(Point::new(-3.0, 0.0)), Color::CLEAR);
        assert_eq!(g.color_at(Point::new(7.0, 0.0)), Color::CLEAR);
    }

    #[test]
    fn degenerate_axis_uses_first_stop() {
        let mut g = LinearGradient::gloss();
        g.end = g.start;
        assert_eq!(g.color_at(Point::new(0.5, 0.5)), Color::CLEAR);
    }

    #[test]
    fn empty_gradient_is_clear() {
        let g = LinearGradient {
            start: Point::ZERO,
            end: Point::new(1.0, 0.0),
            stops: Vec::new(),
        };
        assert_eq!(g.color_at(Point::new(0.5, 0.0)), Color::CLEAR);
    }

    #[test]
    fn replicator_instances_step_by_spacing() {
        let r = Replicator::horizontal(GLOSS_INSTANCE_COUNT, 25.0);
        assert_eq!(r.spacing(), 25.0);
        let xs: Vec<f64> = r.instances().map(|t| t.translation().x).collect();
        assert_eq!(xs, [0.0, 25.0]);
    }
}
