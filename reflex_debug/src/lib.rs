// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for reflex
//! diagnostics.
//!
//! This crate provides [`TraceSink`](reflex_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded bytes.
//!
//! [`tree`] renders a layer subtree as indented text or JSON, for inspecting
//! what a presenter is being asked to mirror.

pub mod chrome;
pub mod pretty;
pub mod recorder;
pub mod tree;
