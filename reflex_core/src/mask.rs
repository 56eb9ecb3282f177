// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mask sampling and content masking.
//!
//! A host shows its content through the gloss mask: wherever the mask has
//! coverage the content is visible, elsewhere it is not. [`MaskSampler`]
//! evaluates the coverage of a mask subtree in software, and [`ContentMask`]
//! combines it with a piece of [`HostContent`].
//!
//! Sampling reads local properties straight from the store, so it does not
//! require a prior [`evaluate`](crate::layer::LayerStore::evaluate).

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Size};

use crate::layer::{LayerContent, LayerId, LayerStore};
use crate::paint::{Color, LinearGradient};
use crate::transform::Transform3d;

/// Opacity hosts apply to their masked content by default.
pub const DEFAULT_MASK_OPACITY: f32 = 0.4;

#[derive(Clone, Debug)]
enum Paint {
    Fill(Color),
    Gradient(LinearGradient),
}

impl Paint {
    fn alpha_at(&self, unit: Point) -> f32 {
        match self {
            Self::Fill(color) => color.a,
            Self::Gradient(gradient) => gradient.color_at(unit).a,
        }
    }
}

#[derive(Clone, Debug)]
struct PaintItem {
    /// Maps mask-root space into the layer's local space.
    inverse: Affine,
    size: Size,
    opacity: f32,
    paint: Paint,
}

/// A flattened, read-only snapshot of a mask subtree.
///
/// Replicator instances are expanded and hidden layers are dropped at
/// construction, so [`coverage`](Self::coverage) is a linear scan over the
/// painting layers in draw order.
#[derive(Clone, Debug, Default)]
pub struct MaskSampler {
    items: Vec<PaintItem>,
}

impl MaskSampler {
    /// Snapshots the subtree rooted at `root`.
    ///
    /// Coordinates passed to [`coverage`](Self::coverage) are in `root`'s
    /// local space; `root`'s own transform is not applied, but its opacity
    /// is.
    ///
    /// # Panics
    ///
    /// Panics if `root` belongs to another store.
    #[must_use]
    pub fn new(store: &LayerStore, root: LayerId) -> Self {
        let mut items = Vec::new();
        collect(store, root, Transform3d::IDENTITY, 1.0, &mut items);
        Self { items }
    }

    /// Returns the number of painting items after instance expansion.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing in the subtree paints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the composited mask alpha at `point`, in `[0, 1]`.
    #[must_use]
    pub fn coverage(&self, point: Point) -> f32 {
        self.items.iter().fold(0.0, |dst, item| {
            let local = item.inverse * point;
            if local.x < 0.0
                || local.y < 0.0
                || local.x >= item.size.width
                || local.y >= item.size.height
            {
                return dst;
            }
            let unit = Point::new(local.x / item.size.width, local.y / item.size.height);
            let src = item.paint.alpha_at(unit) * item.opacity;
            src + dst * (1.0 - src)
        })
    }

    /// Samples coverage at pixel centres into a row-major buffer.
    #[must_use]
    pub fn rasterize(&self, width: u32, height: u32) -> Vec<f32> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                out.push(self.coverage(p));
            }
        }
        out
    }
}

fn collect(
    store: &LayerStore,
    id: LayerId,
    to_root: Transform3d,
    parent_opacity: f32,
    items: &mut Vec<PaintItem>,
) {
    if store.flags(id).hidden {
        return;
    }
    let opacity = parent_opacity * store.local_opacity(id);
    let size = store.bounds(id);
    let painted = match store.content(id) {
        LayerContent::Group => None,
        LayerContent::Fill(color) => Some(Paint::Fill(*color)),
        LayerContent::Gradient(gradient) => Some(Paint::Gradient(gradient.clone())),
        LayerContent::Replicator(replicator) => {
            for instance in replicator.instances() {
                let base = to_root * instance;
                for child in store.children(id) {
                    collect(
                        store,
                        child,
                        base * store.local_transform(child),
                        opacity,
                        items,
                    );
                }
            }
            return;
        }
    };

    if let Some(paint) = painted {
        let inverse = to_root.to_affine().inverse();
        if size.width > 0.0 && size.height > 0.0 && inverse.is_finite() {
            items.push(PaintItem {
                inverse,
                size,
                opacity,
                paint,
            });
        }
    }
    for child in store.children(id) {
        collect(
            store,
            child,
            to_root * store.local_transform(child),
            opacity,
            items,
        );
    }
}

/// A single-channel coverage bitmap, tinted with one color.
///
/// Models a label's rendered glyphs: `alpha` holds per-pixel coverage and
/// `tint` the text color.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaBitmap {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    tint: Color,
}

impl AlphaBitmap {
    /// Creates a bitmap from row-major coverage bytes.
    ///
    /// # Panics
    ///
    /// Panics if `alpha.len() != width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, alpha: Vec<u8>, tint: Color) -> Self {
        assert_eq!(
            alpha.len(),
            width as usize * height as usize,
            "alpha buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            alpha,
            tint,
        }
    }

    /// Creates a bitmap by evaluating `f(x, y)` for every pixel.
    #[must_use]
    pub fn from_fn(
        width: u32,
        height: u32,
        tint: Color,
        mut f: impl FnMut(u32, u32) -> u8,
    ) -> Self {
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self::new(width, height, alpha, tint)
    }

    /// Returns the bitmap size in pixels.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Returns the tint color.
    #[must_use]
    pub fn tint(&self) -> Color {
        self.tint
    }

    /// Returns the tinted color of the pixel containing `point`.
    ///
    /// Points outside the bitmap are transparent.
    #[must_use]
    pub fn color_at(&self, point: Point) -> Color {
        if !(point.x >= 0.0 && point.y >= 0.0) {
            return Color::CLEAR;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "non-negative and range-checked against u32 dimensions below"
        )]
        let (x, y) = (point.x.floor() as u64, point.y.floor() as u64);
        if x >= u64::from(self.width) || y >= u64::from(self.height) {
            return Color::CLEAR;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "bounded by the buffer length"
        )]
        let i = (y * u64::from(self.width) + x) as usize;
        let coverage = f32::from(self.alpha[i]) / 255.0;
        self.tint.with_alpha(self.tint.a * coverage)
    }
}

/// The content a host shows through the mask.
#[derive(Clone, Debug, PartialEq)]
pub enum HostContent {
    /// A solid rectangle at the origin.
    Fill {
        /// Rectangle size.
        size: Size,
        /// Fill color.
        color: Color,
    },
    /// Rendered glyph coverage.
    Glyphs(AlphaBitmap),
}

impl HostContent {
    /// Returns the content size.
    #[must_use]
    pub fn size(&self) -> Size {
        match self {
            Self::Fill { size, .. } => *size,
            Self::Glyphs(bitmap) => bitmap.size(),
        }
    }

    /// Returns the unmasked content color at `point`.
    #[must_use]
    pub fn color_at(&self, point: Point) -> Color {
        match self {
            Self::Fill { size, color } => {
                let inside = point.x >= 0.0
                    && point.y >= 0.0
                    && point.x < size.width
                    && point.y < size.height;
                if inside { *color } else { Color::CLEAR }
            }
            Self::Glyphs(bitmap) => bitmap.color_at(point),
        }
    }
}

/// Host content displayed through a gloss mask.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentMask {
    /// What is being masked.
    pub content: HostContent,
    /// Opacity of the masked content as a whole.
    pub opacity: f32,
}

impl ContentMask {
    /// Wraps `content` with [`DEFAULT_MASK_OPACITY`].
    #[must_use]
    pub fn new(content: HostContent) -> Self {
        Self {
            content,
            opacity: DEFAULT_MASK_OPACITY,
        }
    }

    /// Returns `self` with a different opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Returns the visible color at `point`: the content color with its alpha
    /// scaled by mask coverage and opacity.
    #[must_use]
    pub fn visible_at(&self, sampler: &MaskSampler, point: Point) -> Color {
        let color = self.content.color_at(point);
        if color.a == 0.0 {
            return color;
        }
        color.with_alpha(color.a * sampler.coverage(point) * self.opacity)
    }
}
