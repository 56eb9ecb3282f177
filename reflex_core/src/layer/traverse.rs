// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{LayerId, NONE};
use super::store::LayerStore;

/// An iterator over the direct children of a layer, in paint order.
///
/// Created by [`LayerStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a LayerStore,
    next: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a LayerStore, first: u32) -> Self {
        Self { store, next: first }
    }
}

impl Iterator for Children<'_> {
    type Item = LayerId;

    fn next(&mut self) -> Option<LayerId> {
        if self.next == NONE {
            return None;
        }
        let id = LayerId(self.next);
        self.next = self.store.next_sibling[id.slot()];
        Some(id)
    }
}

/// A depth-first pre-order walk of a subtree, yielding each layer with its
/// depth below the starting layer (which has depth 0).
///
/// Created by [`LayerStore::descendants`]. Replicator instancing is not
/// expanded; each layer is visited once.
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a LayerStore,
    stack: Vec<(LayerId, usize)>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a LayerStore, root: LayerId) -> Self {
        let mut stack = Vec::new();
        stack.push((root, 0));
        Self { store, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = (LayerId, usize);

    fn next(&mut self) -> Option<(LayerId, usize)> {
        let (id, depth) = self.stack.pop()?;
        // Reversed so the first child is popped next.
        let mark = self.stack.len();
        let children = Children::new(self.store, self.store.first_child[id.slot()]);
        self.stack.extend(children.map(|child| (child, depth + 1)));
        self.stack[mark..].reverse();
        Some((id, depth))
    }
}
