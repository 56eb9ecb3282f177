// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gloss reflection engine.
//!
//! [`ReflexEngine`] owns a four-layer scene graph and turns two scalar inputs
//! into transforms on it:
//!
//! ```text
//!   mask root      bounds = content bounds, hidden while degenerate
//!     └─ rotation  bounds = content bounds, rotation by `angle` about its center
//!          └─ replicator  D × D, sweep translation, 2 instances stepped by D × scatter
//!               └─ gloss band  D × D, transparent → black → transparent
//! ```
//!
//! `D` is the diagonal of the content bounds, so the band square covers the
//! content under any rotation. Rotation is the outer transform and the sweep
//! translation the inner one, which keeps the sweep direction fixed relative
//! to the rotated assembly while the whole block spins.
//!
//! The host installs the mask root over its own content (see
//! [`mask`](crate::mask)). The engine is confined to one thread; see
//! [`backend`](crate::backend#threading).

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size};

use crate::backend::Presenter;
use crate::layer::{FrameChanges, LayerContent, LayerFlags, LayerId, LayerStore};
use crate::mask::MaskSampler;
use crate::paint::{GLOSS_INSTANCE_COUNT, LinearGradient, Replicator};
use crate::trace::{CommitEvent, ParamChanges, Tracer};
use crate::transform::Transform3d;

/// Wraps `v` into `[0, 1)` with exact modulo-1 semantics.
///
/// Equivalent to repeatedly adding or subtracting 1 until the value lands in
/// range, but O(1) for inputs of any magnitude. Non-finite input is returned
/// unchanged.
#[inline]
#[must_use]
pub fn normalize_offset(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let wrapped = v - v.floor();
    // Tiny negative inputs round to exactly 1.0.
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Returns the diagonal extent `sqrt(w² + h²)` of a size.
#[inline]
#[must_use]
pub fn diagonal_extent(size: Size) -> f64 {
    (size.width * size.width + size.height * size.height).sqrt()
}

/// Construction-time engine parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReflexConfig {
    /// Initial replicator spacing as a multiple of the diagonal extent.
    pub scatter: f64,
    /// Opacity of the mask root layer.
    pub mask_opacity: f32,
}

impl Default for ReflexConfig {
    fn default() -> Self {
        Self {
            scatter: 1.0,
            mask_opacity: 1.0,
        }
    }
}

impl ReflexConfig {
    /// Preset matching the translucent highlight used over labels.
    #[must_use]
    pub fn label() -> Self {
        Self {
            mask_opacity: crate::mask::DEFAULT_MASK_OPACITY,
            ..Self::default()
        }
    }
}

/// Handles to the engine's layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlossLayers {
    /// Mask root; the layer the host installs over its content.
    pub root: LayerId,
    /// Pure rotation container.
    pub rotation: LayerId,
    /// Replicator carrying the sweep translation.
    pub replicator: LayerId,
    /// The gradient band template.
    pub gloss: LayerId,
}

/// Drives a tilt-reactive gloss sweep over a rectangular content region.
///
/// Inputs are total: offsets wrap into `[0, 1)`, angles are periodic, and
/// zero-area bounds hide the mask while the nodes keep tracking the
/// diagonal. Each setter
/// records the change as an immediate (non-animated) batch; call
/// [`commit`](Self::commit) or [`evaluate`](Self::evaluate) to hand it to a
/// presenter.
#[derive(Debug)]
pub struct ReflexEngine {
    store: LayerStore,
    layers: GlossLayers,
    bounds: Size,
    offset: f64,
    angle: f64,
    scatter: f64,
    pending: ParamChanges,
    commits: u64,
}

impl Default for ReflexEngine {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl ReflexEngine {
    /// Creates an engine for content of the given size.
    #[must_use]
    pub fn new(bounds: Size) -> Self {
        Self::with_config(bounds, ReflexConfig::default())
    }

    /// Creates an engine with explicit configuration.
    ///
    /// The scene graph is built here, once; later calls only resize and
    /// retransform it.
    #[must_use]
    pub fn with_config(bounds: Size, config: ReflexConfig) -> Self {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let rotation = store.create_layer();
        let replicator = store.create_layer();
        let gloss = store.create_layer();

        store.add_child(root, rotation);
        store.add_child(rotation, replicator);
        store.add_child(replicator, gloss);

        store.set_opacity(root, config.mask_opacity);
        store.set_content(
            replicator,
            LayerContent::Replicator(Replicator::horizontal(GLOSS_INSTANCE_COUNT, 0.0)),
        );
        store.set_content(gloss, LayerContent::Gradient(LinearGradient::gloss()));

        let mut engine = Self {
            store,
            layers: GlossLayers {
                root,
                rotation,
                replicator,
                gloss,
            },
            bounds: Size::ZERO,
            offset: 0.0,
            angle: 0.0,
            scatter: sanitize_scatter(config.scatter).unwrap_or(1.0),
            pending: ParamChanges::default(),
            commits: 0,
        };
        engine.set_bounds(bounds.width, bounds.height);
        engine
    }

    // -- Inputs --

    /// Sets the content bounds and re-lays out every node.
    ///
    /// Cheap and idempotent; safe to call on every layout pass. Negative or
    /// non-finite components are treated as zero.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        self.bounds = Size::new(sanitize_extent(width), sanitize_extent(height));
        self.update_size();
    }

    /// Re-applies sizes and transforms from the stored bounds.
    ///
    /// Hosts call this after any layout change that may have affected the
    /// bounds; [`set_bounds`](Self::set_bounds) calls it implicitly.
    pub fn update_size(&mut self) {
        self.pending.bounds = true;
        self.store.disable_actions();

        let degenerate = self.is_degenerate();
        let root = self.layers.root;
        if self.store.flags(root).hidden != degenerate {
            self.store.set_flags(root, LayerFlags { hidden: degenerate });
        }

        let d = self.diagonal();
        let square = Size::new(d, d);
        self.store.set_bounds(root, self.bounds);
        self.store.set_bounds(self.layers.rotation, self.bounds);
        self.store.set_bounds(self.layers.replicator, square);
        self.store.set_bounds(self.layers.gloss, square);
        self.apply_spacing();
        if self.has_extent() {
            self.apply_sweep();
            self.apply_rotation();
        }
    }

    /// Sets the sweep position.
    ///
    /// `v` is wrapped into `[0, 1)`; non-finite values are ignored.
    pub fn set_offset(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.offset = normalize_offset(v);
        self.pending.offset = true;
        self.store.disable_actions();
        if self.has_extent() {
            self.apply_sweep();
        }
    }

    /// Sets the rotation of the whole sweep assembly, in radians.
    ///
    /// Only the rotation node is touched. Non-finite values are ignored.
    pub fn set_angle(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.angle = v;
        self.pending.angle = true;
        self.store.disable_actions();
        if self.has_extent() {
            self.apply_rotation();
        }
    }

    /// Sets the spacing between band instances, as a multiple of the
    /// diagonal extent.
    ///
    /// Negative values clamp to zero; non-finite values are ignored.
    pub fn set_scatter(&mut self, v: f64) {
        let Some(scatter) = sanitize_scatter(v) else {
            return;
        };
        self.scatter = scatter;
        self.pending.scatter = true;
        self.store.disable_actions();
        self.apply_spacing();
        if self.has_extent() {
            self.apply_sweep();
        }
    }

    // -- Queries --

    /// Returns the content bounds.
    #[must_use]
    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Returns the diagonal extent of the content bounds.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        diagonal_extent(self.bounds)
    }

    /// Returns the stored offset, always in `[0, 1)`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Returns the stored angle in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Returns the stored scatter.
    #[must_use]
    pub fn scatter(&self) -> f64 {
        self.scatter
    }

    /// Returns `true` while the bounds have zero area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.bounds.width <= 0.0 || self.bounds.height <= 0.0
    }

    /// Returns the size of the gloss band layer.
    #[must_use]
    pub fn gloss_size(&self) -> Size {
        self.store.bounds(self.layers.gloss)
    }

    /// Returns the translation between replicated band instances.
    #[must_use]
    pub fn instance_spacing(&self) -> f64 {
        self.store
            .content(self.layers.replicator)
            .as_replicator()
            .map_or(0.0, Replicator::spacing)
    }

    /// Returns the sweep transform currently applied to the replicator.
    #[must_use]
    pub fn sweep_transform(&self) -> Transform3d {
        self.store.local_transform(self.layers.replicator)
    }

    /// Returns the rotation transform currently applied to the rotation node.
    #[must_use]
    pub fn rotation_transform(&self) -> Transform3d {
        self.store.local_transform(self.layers.rotation)
    }

    /// Returns the layer the host installs as its content mask.
    #[must_use]
    pub fn mask_layer(&self) -> LayerId {
        self.layers.root
    }

    /// Returns handles to all engine layers.
    #[must_use]
    pub fn layers(&self) -> GlossLayers {
        self.layers
    }

    /// Returns the layer store backing the scene graph.
    #[must_use]
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Returns a sampler over the current mask.
    #[must_use]
    pub fn sampler(&self) -> MaskSampler {
        MaskSampler::new(&self.store, self.layers.root)
    }

    // -- Output --

    /// Evaluates pending changes without presenting them.
    pub fn evaluate(&mut self) -> FrameChanges {
        self.pending = ParamChanges::default();
        self.store.evaluate()
    }

    /// Evaluates pending changes, applies them to `presenter`, and traces the
    /// commit.
    pub fn commit(&mut self, presenter: &mut dyn Presenter, tracer: &mut Tracer<'_>) {
        let changed = self.pending;
        let changes = self.evaluate();
        presenter.apply(&self.store, &changes);

        let sequence = self.commits;
        self.commits += 1;

        #[cfg(feature = "trace-rich")]
        if tracer.is_active() {
            let records = layer_changes(&changes);
            tracer.layer_changes(sequence, &records);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "the scene graph has four layers"
        )]
        let transforms = changes.transforms.len() as u32;
        tracer.commit(&CommitEvent {
            sequence,
            offset: self.offset,
            angle: self.angle,
            scatter: self.scatter,
            diagonal: self.diagonal(),
            degenerate: self.is_degenerate(),
            changed,
            transforms,
            transition: changes.transition,
        });
    }

    // -- Internals --

    /// `false` while the diagonal is zero; transforms wait for the next resize.
    fn has_extent(&self) -> bool {
        self.diagonal() > 0.0
    }

    fn apply_spacing(&mut self) {
        let spacing = self.diagonal() * self.scatter;
        self.store.set_instance_transform(
            self.layers.replicator,
            Transform3d::from_translation(spacing, 0.0, 0.0),
        );
    }

    fn apply_sweep(&mut self) {
        let d = self.diagonal();
        let sweep = Transform3d::from_translation(-self.offset * d * self.scatter, 0.0, 0.0)
            * Transform3d::from_translation(
                -(d - self.bounds.width) / 2.0,
                -(d - self.bounds.height) / 2.0,
                0.0,
            );
        debug_assert!(sweep.is_finite(), "non-finite sweep transform");
        self.store.set_transform(self.layers.replicator, sweep);
    }

    fn apply_rotation(&mut self) {
        let center = Point::new(self.bounds.width / 2.0, self.bounds.height / 2.0);
        self.store.set_transform(
            self.layers.rotation,
            Transform3d::from_rotation_about(self.angle, center),
        );
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

fn sanitize_scatter(v: f64) -> Option<f64> {
    v.is_finite().then(|| v.max(0.0))
}

#[cfg(feature = "trace-rich")]
fn layer_changes(changes: &FrameChanges) -> alloc::vec::Vec<crate::trace::LayerChange> {
    use crate::trace::{LayerChange, LayerField};

    let mut out = alloc::vec::Vec::new();
    let mut push = |list: &[u32], field: LayerField| {
        out.extend(list.iter().map(|&layer_index| LayerChange { layer_index, field }));
    };
    push(&changes.transforms, LayerField::Transform);
    push(&changes.opacities, LayerField::Opacity);
    push(&changes.geometry, LayerField::Geometry);
    push(&changes.content, LayerField::Content);
    push(&changes.added, LayerField::Topology);
    out
}
