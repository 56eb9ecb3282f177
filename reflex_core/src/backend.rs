// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! The engine never talks to a platform compositor directly. A host provides
//! a [`Presenter`] that mirrors the [`LayerStore`] into its native tree
//! (`CALayer`s with a gradient and a replicator layer, DOM elements, a
//! software rasterizer) and installs the mask root over its own content.
//!
//! # Transitions
//!
//! Every batch produced by the gloss engine carries
//! [`Transition::Immediate`](crate::layer::Transition::Immediate): offsets
//! arrive at sensor rate, and any implicit tween inserted by the backend
//! would visibly lag behind the device. Presenters for platforms that
//! animate property changes by default (Core Animation's implicit actions,
//! CSS transitions) must suppress that behavior for such batches, e.g. by
//! wrapping the batch in a `CATransaction` with actions disabled.
//!
//! # Threading
//!
//! `apply` is called on the presentation thread. Nothing in this crate
//! synchronizes access; the host guarantees single-thread use.

use crate::layer::{FrameChanges, LayerStore};

/// Applies evaluated frame changes to a host presentation tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_sample(sample: AttitudeSample) {
///     // Mutate: parameters are wrapped and turned into transforms.
///     engine.set_offset(sample.attitude.offset());
///
///     // Evaluate + present: drain dirty channels and mirror the changes.
///     engine.commit(&mut presenter, &mut tracer);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`FrameChanges`] to the backing presentation tree,
    /// reading current property values from `store` as needed.
    ///
    /// Must honor [`FrameChanges::transition`].
    fn apply(&mut self, store: &LayerStore, changes: &FrameChanges);
}

/// A [`Presenter`] that ignores every batch.
///
/// Useful for hosts that only sample the mask on demand (see
/// [`MaskSampler`](crate::mask::MaskSampler)) and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply(&mut self, store: &LayerStore, changes: &FrameChanges) {
        _ = (store, changes);
    }
}
