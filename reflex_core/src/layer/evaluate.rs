// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch evaluation.
//!
//! [`LayerStore::evaluate`] drains every dirty channel once and resolves the
//! inherited properties of the affected layers:
//!
//! - TRANSFORM: world transform is `parent_world * local`, and effective
//!   hidden is `parent_hidden || flags.hidden`. Transitions of the latter
//!   are reported in [`FrameChanges::hidden`] and [`FrameChanges::unhidden`].
//! - OPACITY: effective opacity is `parent_effective * local`.
//! - GEOMETRY and CONTENT are reported as-is; presenters read the new values
//!   from the store.
//! - TOPOLOGY only sets [`FrameChanges::topology_changed`].
//!
//! Indices in [`FrameChanges`] are raw slots, matching
//! [`LayerId::index`](super::LayerId::index).

use alloc::vec::Vec;

use understory_dirty::Channel;

use super::id::NONE;
use super::store::LayerStore;
use crate::dirty;
use crate::transform::Transform3d;

/// How a presenter should apply a batch of changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Transition {
    /// The backend may use its default behavior, including any implicit
    /// property animation it performs.
    #[default]
    Implicit,
    /// Apply every change atomically with no interpolation.
    Immediate,
}

/// Everything one [`LayerStore::evaluate`] call found changed.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Layers whose world transform was re-resolved.
    pub transforms: Vec<u32>,
    /// Layers whose effective opacity was re-resolved.
    pub opacities: Vec<u32>,
    /// Layers whose bounds changed.
    pub geometry: Vec<u32>,
    /// Layers whose content changed.
    pub content: Vec<u32>,
    /// Layers that became effectively hidden.
    pub hidden: Vec<u32>,
    /// Layers that stopped being effectively hidden.
    pub unhidden: Vec<u32>,
    /// Layers created since the previous batch.
    pub added: Vec<u32>,
    /// Whether layers were created or linked since the previous batch.
    pub topology_changed: bool,
    /// How the batch must be applied.
    pub transition: Transition,
}

impl FrameChanges {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.topology_changed
            && [
                &self.transforms,
                &self.opacities,
                &self.geometry,
                &self.content,
                &self.hidden,
                &self.unhidden,
                &self.added,
            ]
            .iter()
            .all(|list| list.is_empty())
    }
}

impl LayerStore {
    /// Resolves inherited properties and returns the batch of changes since
    /// the previous call.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges {
            transforms: self.drain_inherited(dirty::TRANSFORM),
            opacities: self.drain_inherited(dirty::OPACITY),
            geometry: self.drain_local(dirty::GEOMETRY),
            content: self.drain_local(dirty::CONTENT),
            topology_changed: !self.drain_local(dirty::TOPOLOGY).is_empty(),
            added: core::mem::take(&mut self.created),
            transition: core::mem::take(&mut self.transition),
            ..FrameChanges::default()
        };

        // Drains are ordered parents-first, so each parent is already resolved.
        for &idx in &changes.transforms {
            let i = idx as usize;
            let (above, hidden_above) = match self.parent[i] {
                NONE => (Transform3d::IDENTITY, false),
                p => (
                    self.world_transform[p as usize],
                    self.effective_hidden[p as usize],
                ),
            };
            self.world_transform[i] = above * self.transform[i];

            let hidden = hidden_above || self.flags[i].hidden;
            if hidden != self.effective_hidden[i] {
                self.effective_hidden[i] = hidden;
                let list = if hidden {
                    &mut changes.hidden
                } else {
                    &mut changes.unhidden
                };
                list.push(idx);
            }
        }

        for &idx in &changes.opacities {
            let i = idx as usize;
            let above = match self.parent[i] {
                NONE => 1.0,
                p => self.effective_opacity[p as usize],
            };
            self.effective_opacity[i] = above * self.opacity[i];
        }

        changes
    }

    fn drain_inherited(&mut self, channel: Channel) -> Vec<u32> {
        self.dirty
            .drain(channel)
            .affected()
            .deterministic()
            .run()
            .collect()
    }

    fn drain_local(&mut self, channel: Channel) -> Vec<u32> {
        self.dirty.drain(channel).deterministic().run().collect()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::layer::{LayerContent, LayerFlags};
    use crate::paint::LinearGradient;

    #[test]
    fn world_transform_composes_down_the_chain() {
        let mut store = LayerStore::new();
        let top = store.create_layer();
        let mid = store.create_layer();
        let leaf = store.create_layer();
        store.add_child(top, mid);
        store.add_child(mid, leaf);

        let shift = Transform3d::from_translation(10.0, 0.0, 0.0);
        let spin = Transform3d::from_rotation_z(0.5);
        let lift = Transform3d::from_translation(0.0, 5.0, 0.0);
        store.set_transform(top, shift);
        store.set_transform(mid, spin);
        store.set_transform(leaf, lift);
        let _ = store.evaluate();

        assert_eq!(store.world_transform(mid), shift * spin);
        assert_eq!(store.world_transform(leaf), shift * spin * lift);
    }

    #[test]
    fn moving_a_parent_re_resolves_its_subtree_only() {
        let mut store = LayerStore::new();
        let top = store.create_layer();
        let left = store.create_layer();
        let right = store.create_layer();
        let leaf = store.create_layer();
        store.add_child(top, left);
        store.add_child(top, right);
        store.add_child(left, leaf);
        let _ = store.evaluate();

        store.set_transform(left, Transform3d::from_rotation_z(0.5));
        let changes = store.evaluate();
        assert_eq!(changes.transforms.len(), 2);
        assert!(changes.transforms.contains(&left.index()));
        assert!(changes.transforms.contains(&leaf.index()));
        assert_eq!(
            store.world_transform(leaf),
            Transform3d::from_rotation_z(0.5)
        );
    }

    #[test]
    fn effective_opacity_multiplies() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.set_opacity(parent, 0.5);
        store.set_opacity(child, 0.8);
        store.add_child(parent, child);
        let _ = store.evaluate();

        assert!((store.effective_opacity(child) - 0.4).abs() < 1e-6);

        store.set_opacity(parent, 1.0);
        let changes = store.evaluate();
        assert!(changes.opacities.contains(&child.index()));
        assert!((store.effective_opacity(child) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn hiding_a_parent_reports_its_subtree() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        let _ = store.evaluate();

        store.set_flags(parent, LayerFlags { hidden: true });
        let changes = store.evaluate();
        assert_eq!(changes.hidden, [parent.index(), child.index()]);
        assert!(store.effective_hidden(child));

        store.set_flags(parent, LayerFlags::default());
        let changes = store.evaluate();
        assert_eq!(changes.unhidden, [parent.index(), child.index()]);
        assert!(!store.effective_hidden(child));
    }

    #[test]
    fn first_batch_reports_construction() {
        let mut store = LayerStore::new();
        let a = store.create_layer();
        let b = store.create_layer();
        store.add_child(a, b);

        let changes = store.evaluate();
        assert_eq!(changes.added, [a.index(), b.index()]);
        assert!(changes.topology_changed);

        let changes = store.evaluate();
        assert!(changes.is_empty());
        assert_eq!(changes.transition, Transition::Implicit);
    }

    #[test]
    fn geometry_and_content_are_reported_per_layer() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let child = store.create_layer();
        store.add_child(parent, child);
        let _ = store.evaluate();

        store.set_bounds(parent, Size::new(50.0, 50.0));
        store.set_content(child, LayerContent::Gradient(LinearGradient::gloss()));
        let changes = store.evaluate();
        assert_eq!(changes.geometry, [parent.index()]);
        assert_eq!(changes.content, [child.index()]);
        assert!(changes.transforms.is_empty());
        assert!(!changes.is_empty());
    }
}
