// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column storage for a layer tree that is built once and then only mutated
//! through its properties.

use alloc::vec::Vec;

use kurbo::Size;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::transform::Transform3d;

use super::content::LayerContent;
use super::evaluate::Transition;
use super::id::{LayerId, NONE};
use super::traverse::{Children, Descendants};

/// Per-layer boolean flags.
///
/// Setting [`hidden`](Self::hidden) suppresses all visual contribution of the
/// layer and its subtree. Properties can still be mutated while hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerFlags {
    /// Whether the layer (and its subtree) is hidden.
    pub hidden: bool,
}

/// Struct-of-arrays storage for a layer tree.
///
/// Layers are created and linked while a scene graph is built, then live for
/// as long as the store. There is no detach or destroy: after construction
/// only properties change.
///
/// The store is not synchronized. All mutation must happen on one thread
/// (the presentation thread); moving samples from other threads onto it is
/// the caller's job.
#[derive(Debug)]
pub struct LayerStore {
    // -- Links --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,

    // -- Local properties --
    pub(crate) transform: Vec<Transform3d>,
    pub(crate) opacity: Vec<f32>,
    pub(crate) bounds: Vec<Size>,
    pub(crate) content: Vec<LayerContent>,
    pub(crate) flags: Vec<LayerFlags>,

    // -- Resolved by evaluate --
    pub(crate) world_transform: Vec<Transform3d>,
    pub(crate) effective_opacity: Vec<f32>,
    pub(crate) effective_hidden: Vec<bool>,

    pub(crate) dirty: DirtyTracker<u32>,
    /// Layers created since the last evaluate.
    pub(crate) created: Vec<u32>,
    pub(crate) transition: Transition,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty layer store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            transform: Vec::new(),
            opacity: Vec::new(),
            bounds: Vec::new(),
            content: Vec::new(),
            flags: Vec::new(),
            world_transform: Vec::new(),
            effective_opacity: Vec::new(),
            effective_hidden: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            created: Vec::new(),
            transition: Transition::Implicit,
        }
    }

    /// Creates a new, unparented layer and returns its handle.
    ///
    /// The layer starts with an identity transform, full opacity, zero
    /// bounds, and [`LayerContent::Group`] content.
    pub fn create_layer(&mut self) -> LayerId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "scene graphs hold a handful of layers"
        )]
        let id = LayerId(self.parent.len() as u32);

        for links in [
            &mut self.parent,
            &mut self.first_child,
            &mut self.last_child,
            &mut self.next_sibling,
        ] {
            links.push(NONE);
        }
        self.transform.push(Transform3d::IDENTITY);
        self.opacity.push(1.0);
        self.bounds.push(Size::ZERO);
        self.content.push(LayerContent::Group);
        self.flags.push(LayerFlags::default());
        self.world_transform.push(Transform3d::IDENTITY);
        self.effective_opacity.push(1.0);
        self.effective_hidden.push(false);

        self.created.push(id.0);
        self.dirty.mark(id.0, dirty::TOPOLOGY);
        id
    }

    /// Returns the number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if no layer has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    // -- Topology --

    /// Appends `child` to `parent`'s children.
    ///
    /// The child's subtree is marked so world transform, effective opacity,
    /// and effective hidden state are resolved under the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is unknown, if `child` already has a parent,
    /// or if `parent` lies inside `child`'s subtree.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        let p = self.slot(parent);
        let c = self.slot(child);
        assert!(self.parent[c] == NONE, "child already has a parent");
        assert!(
            !self.ancestors_and_self(parent).any(|id| id == child),
            "add_child would create a cycle"
        );

        self.parent[c] = parent.0;
        match self.last_child[p] {
            NONE => self.first_child[p] = child.0,
            last => self.next_sibling[last as usize] = child.0,
        }
        self.last_child[p] = child.0;

        // Acyclic by the check above.
        let _ = self.dirty.add_dependency(child.0, parent.0, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(child.0, parent.0, dirty::OPACITY);
        self.dirty.mark_with(child.0, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(child.0, dirty::OPACITY, &EagerPolicy);
        self.dirty.mark(parent.0, dirty::TOPOLOGY);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        match self.parent[self.slot(id)] {
            NONE => None,
            p => Some(LayerId(p)),
        }
    }

    /// Returns an iterator over the direct children of a layer.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        Children::new(self, self.first_child[self.slot(id)])
    }

    /// Returns a depth-first pre-order walk of the subtree rooted at `id`.
    #[must_use]
    pub fn descendants(&self, id: LayerId) -> Descendants<'_> {
        let _ = self.slot(id);
        Descendants::new(self, id)
    }

    // -- Local properties --

    /// Returns the local transform of a layer.
    #[must_use]
    pub fn local_transform(&self, id: LayerId) -> Transform3d {
        self.transform[self.slot(id)]
    }

    /// Returns the local opacity of a layer.
    #[must_use]
    pub fn local_opacity(&self, id: LayerId) -> f32 {
        self.opacity[self.slot(id)]
    }

    /// Returns the bounds of a layer.
    #[must_use]
    pub fn bounds(&self, id: LayerId) -> Size {
        self.bounds[self.slot(id)]
    }

    /// Returns the content of a layer.
    #[must_use]
    pub fn content(&self, id: LayerId) -> &LayerContent {
        &self.content[self.slot(id)]
    }

    /// Returns the flags of a layer.
    #[must_use]
    pub fn flags(&self, id: LayerId) -> LayerFlags {
        self.flags[self.slot(id)]
    }

    /// Sets the local transform of a layer and marks its subtree.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform3d) {
        let i = self.slot(id);
        self.transform[i] = transform;
        self.dirty.mark_with(id.0, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the local opacity of a layer and marks its subtree.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        let i = self.slot(id);
        self.opacity[i] = opacity;
        self.dirty.mark_with(id.0, dirty::OPACITY, &EagerPolicy);
    }

    /// Sets the bounds of a layer.
    pub fn set_bounds(&mut self, id: LayerId, bounds: Size) {
        let i = self.slot(id);
        self.bounds[i] = bounds;
        self.dirty.mark(id.0, dirty::GEOMETRY);
    }

    /// Sets the content of a layer.
    pub fn set_content(&mut self, id: LayerId, content: LayerContent) {
        let i = self.slot(id);
        self.content[i] = content;
        self.dirty.mark(id.0, dirty::CONTENT);
    }

    /// Replaces the instance transform of a replicator layer.
    ///
    /// Returns `false` (and changes nothing) if the layer is not a replicator.
    pub fn set_instance_transform(&mut self, id: LayerId, transform: Transform3d) -> bool {
        let i = self.slot(id);
        let LayerContent::Replicator(replicator) = &mut self.content[i] else {
            return false;
        };
        replicator.instance_transform = transform;
        self.dirty.mark(id.0, dirty::CONTENT);
        true
    }

    /// Sets the flags of a layer.
    pub fn set_flags(&mut self, id: LayerId, flags: LayerFlags) {
        let i = self.slot(id);
        self.flags[i] = flags;
        // Hidden state is inherited, so it rides the TRANSFORM channel.
        self.dirty.mark_with(id.0, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Marks the pending batch of mutations as [`Transition::Immediate`].
    ///
    /// Stays in effect until the next [`evaluate`](Self::evaluate), which
    /// reports it in [`FrameChanges::transition`](super::FrameChanges::transition)
    /// and resets it to [`Transition::Implicit`].
    pub fn disable_actions(&mut self) {
        self.transition = Transition::Immediate;
    }

    /// Returns the transition the pending batch will be applied with.
    #[must_use]
    pub fn pending_transition(&self) -> Transition {
        self.transition
    }

    // -- Resolved properties --

    /// Returns the world transform resolved by the last
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn world_transform(&self, id: LayerId) -> Transform3d {
        self.world_transform[self.slot(id)]
    }

    /// Returns the effective opacity resolved by the last
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn effective_opacity(&self, id: LayerId) -> f32 {
        self.effective_opacity[self.slot(id)]
    }

    /// Returns whether the last [`evaluate`](Self::evaluate) found the layer
    /// hidden, by its own flag or an ancestor's.
    #[must_use]
    pub fn effective_hidden(&self, id: LayerId) -> bool {
        self.effective_hidden[self.slot(id)]
    }

    // -- Internals --

    /// Panics unless `id` was created by this store.
    fn slot(&self, id: LayerId) -> usize {
        assert!(
            id.slot() < self.len(),
            "unknown {id:?} (store holds {} layers)",
            self.len()
        );
        id.slot()
    }

    fn ancestors_and_self(&self, id: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        core::iter::successors(Some(id), |&id| self.parent(id))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::paint::{GLOSS_INSTANCE_COUNT, Replicator};

    #[test]
    fn layers_take_slots_in_creation_order() {
        let mut store = LayerStore::new();
        assert!(store.is_empty());
        let a = store.create_layer();
        let b = store.create_layer();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.content(b), &LayerContent::Group);
        assert_eq!(store.bounds(b), Size::ZERO);
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut store = LayerStore::new();
        let parent = store.create_layer();
        let kids = [
            store.create_layer(),
            store.create_layer(),
            store.create_layer(),
        ];
        for kid in kids {
            store.add_child(parent, kid);
        }

        assert_eq!(store.parent(kids[1]), Some(parent));
        assert_eq!(store.parent(parent), None);
        assert_eq!(store.children(parent).collect::<Vec<_>>(), kids);
        assert!(store.children(kids[0]).next().is_none());
    }

    #[test]
    fn descendants_are_pre_order_with_depth() {
        let mut store = LayerStore::new();
        let a = store.create_layer();
        let b = store.create_layer();
        let c = store.create_layer();
        let d = store.create_layer();
        // a -> [b -> [d], c]
        store.add_child(a, b);
        store.add_child(a, c);
        store.add_child(b, d);

        let walk: Vec<_> = store.descendants(a).collect();
        assert_eq!(walk, vec![(a, 0), (b, 1), (d, 2), (c, 1)]);
        assert_eq!(store.descendants(d).collect::<Vec<_>>(), vec![(d, 0)]);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_parenting_panics() {
        let mut store = LayerStore::new();
        let p1 = store.create_layer();
        let p2 = store.create_layer();
        let child = store.create_layer();
        store.add_child(p1, child);
        store.add_child(p2, child);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn parenting_an_ancestor_panics() {
        let mut store = LayerStore::new();
        let top = store.create_layer();
        let mid = store.create_layer();
        store.add_child(top, mid);
        store.add_child(mid, top);
    }

    #[test]
    #[should_panic(expected = "unknown LayerId")]
    fn foreign_handle_panics() {
        let mut other = LayerStore::new();
        let _ = other.create_layer();
        let foreign = other.create_layer();

        let mut store = LayerStore::new();
        let _ = store.create_layer();
        store.set_transform(foreign, Transform3d::IDENTITY);
    }

    #[test]
    fn set_bounds_marks_geometry_only() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.evaluate();

        store.set_bounds(id, Size::new(10.0, 20.0));
        let changes = store.evaluate();
        assert_eq!(store.bounds(id), Size::new(10.0, 20.0));
        assert_eq!(changes.geometry, [id.index()]);
        assert!(changes.transforms.is_empty(), "bounds do not move layers");
    }

    #[test]
    fn instance_transform_only_applies_to_replicators() {
        let mut store = LayerStore::new();
        let group = store.create_layer();
        let rep = store.create_layer();
        store.set_content(
            rep,
            LayerContent::Replicator(Replicator::horizontal(GLOSS_INSTANCE_COUNT, 1.0)),
        );
        let _ = store.evaluate();

        let step = Transform3d::from_translation(8.0, 0.0, 0.0);
        assert!(!store.set_instance_transform(group, step));
        assert!(store.set_instance_transform(rep, step));
        let changes = store.evaluate();
        assert_eq!(changes.content, [rep.index()]);
        let spacing = store.content(rep).as_replicator().map(Replicator::spacing);
        assert_eq!(spacing, Some(8.0));
    }

    #[test]
    fn set_flags_marks_transform_channel() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.evaluate();

        store.set_flags(id, LayerFlags { hidden: true });
        let changes = store.evaluate();
        assert_eq!(changes.transforms, [id.index()]);
        assert_eq!(changes.hidden, [id.index()]);
    }

    #[test]
    fn disable_actions_lasts_one_batch() {
        let mut store = LayerStore::new();
        let id = store.create_layer();
        let _ = store.evaluate();

        store.disable_actions();
        store.set_transform(id, Transform3d::from_translation(1.0, 0.0, 0.0));
        assert_eq!(store.pending_transition(), Transition::Immediate);
        let changes = store.evaluate();
        assert_eq!(changes.transition, Transition::Immediate);

        store.set_transform(id, Transform3d::IDENTITY);
        let changes = store.evaluate();
        assert_eq!(changes.transition, Transition::Implicit);
    }
}
