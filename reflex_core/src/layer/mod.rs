// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer* is a node in a compositing tree. Each layer has:
//!
//! - An identity ([`LayerId`]), valid for the lifetime of its store.
//! - Topology: parent, child, and sibling links forming an ordered tree. Links
//!   are only ever added.
//! - **Local properties** set by the caller:
//!   [`transform`](LayerStore::set_transform),
//!   [`opacity`](LayerStore::set_opacity), [`bounds`](LayerStore::set_bounds),
//!   [`content`](LayerStore::set_content), and [`flags`](LayerStore::set_flags).
//! - **Computed properties** produced by [`evaluate`](LayerStore::evaluate):
//!   world transform, effective opacity and effective hidden state.
//!
//! A layer's transform maps its local coordinate space (origin at the
//! top-left corner of its bounds) into its parent's space. There is no
//! separate anchor point; rotations about a center are baked into the
//! transform by the caller.
//!
//! # Dirty tracking
//!
//! Property mutations mark the matching channel (see [`dirty`](crate::dirty)).
//! TRANSFORM and OPACITY propagate to descendants; GEOMETRY and CONTENT are
//! local-only; TOPOLOGY records that layers were created or linked.
//!
//! # Transitions
//!
//! [`LayerStore::disable_actions`] marks the pending batch of mutations as
//! [`Transition::Immediate`]. Presenters must then apply the batch without
//! inserting any implicit animation.

mod content;
mod evaluate;
mod id;
mod store;
mod traverse;

pub use content::LayerContent;
pub use evaluate::{FrameChanges, Transition};
pub use id::LayerId;
pub use store::{LayerFlags, LayerStore};
pub use traverse::{Children, Descendants};
