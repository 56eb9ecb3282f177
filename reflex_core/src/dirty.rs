// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Reflex uses multi-channel dirty tracking (via [`understory_dirty`]) so that
//! a high-rate offset update only reports the subtree whose transform moved.
//!
//! # Propagation semantics
//!
//! - **Propagating** — [`TRANSFORM`] and [`OPACITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent. Marking a parent dirty marks all
//!   descendants, because world transforms, effective opacities, and
//!   effective hidden state are inherited. Hidden-flag changes are routed
//!   through [`TRANSFORM`].
//!
//! - **Local-only** — [`GEOMETRY`] and [`CONTENT`] are marked with the default
//!   policy. Bounds and paint are per-layer properties.
//!
//! - **Structural** — [`TOPOLOGY`] is marked when layers are created or
//!   linked, and surfaces as `topology_changed` in the next batch.
//!
//! Callers never query dirty state directly; each
//! [`LayerStore::evaluate`](crate::layer::LayerStore::evaluate) drains all
//! channels into [`FrameChanges`](crate::layer::FrameChanges).

use understory_dirty::Channel;

/// Transform or hidden flag changed.
pub const TRANSFORM: Channel = Channel::new(0);

/// Opacity changed.
pub const OPACITY: Channel = Channel::new(1);

/// Layer bounds changed.
pub const GEOMETRY: Channel = Channel::new(2);

/// Layer paint (gradient, fill, replicator parameters) changed.
pub const CONTENT: Channel = Channel::new(3);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(4);
