// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree and transform engine for tilt-driven gloss reflections.
//!
//! `reflex_core` drives a moving reflective highlight across a rectangular
//! region of content. Two scalar inputs, a sweep *offset* (typically fed from
//! device tilt) and a rotation *angle*, are turned into transforms on a small
//! compositing tree that the host installs as its content mask. It is
//! `no_std` compatible (with `alloc`) and uses array-based struct-of-arrays
//! storage with index handles.
//!
//! # Architecture
//!
//! ```text
//!   attitude sample / slider
//!       │
//!       ▼
//!   ReflexEngine::set_offset() / set_angle() / set_bounds()
//!       │  (wrap, compose transforms, disable implicit actions)
//!       ▼
//!   LayerStore::evaluate() ──► FrameChanges ──► Presenter::apply()
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   host mask root ──► MaskSampler / ContentMask (software path)
//! ```
//!
//! **[`reflex`]** — [`ReflexEngine`](reflex::ReflexEngine): owns the gloss
//! scene graph (mask root, rotation, replicator, gradient band) and keeps
//! its geometry in sync with the content bounds.
//!
//! **[`layer`]** — Struct-of-arrays layer tree, linked once and then only retargeted.
//! Properties (transform, opacity, bounds, content) are set by the caller;
//! world transforms and effective opacities are computed by evaluation.
//!
//! **[`dirty`]** — Multi-channel dirty tracking via `understory_dirty`.
//! Property mutations automatically mark the appropriate channel. TRANSFORM
//! and OPACITY propagate to descendants; GEOMETRY and CONTENT are
//! local-only; TOPOLOGY records construction.
//!
//! **[`paint`]** — Colors, the gloss [`LinearGradient`](paint::LinearGradient)
//! and the instance [`Replicator`](paint::Replicator).
//!
//! **[`mask`]** — Software evaluation of mask coverage and of host content
//! seen through it.
//!
//! **[`backend`]** — The [`Presenter`](backend::Presenter) trait that host
//! integrations implement to mirror frame changes into native trees.
//!
//! **[`transform`]** — 3D affine transform type for layer positioning.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! commit and sample instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use kurbo::Size;
//! use reflex_core::reflex::ReflexEngine;
//!
//! let mut engine = ReflexEngine::new(Size::new(100.0, 100.0));
//! engine.set_offset(1.25);
//! assert_eq!(engine.offset(), 0.25);
//!
//! let sweep = engine.sweep_transform().translation();
//! assert!((sweep.x + 56.066).abs() < 1e-3);
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   change events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod dirty;
pub mod layer;
pub mod mask;
pub mod paint;
pub mod reflex;
pub mod trace;
pub mod transform;
